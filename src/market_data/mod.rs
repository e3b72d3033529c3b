// =============================================================================
// Market Data - raw streams in, normalized series out
// =============================================================================

pub mod normalizer;
pub mod resample;
pub mod series;

pub use normalizer::{normalize, normalize_chart};
pub use resample::{resample, ResamplePolicy};
pub use series::{NormalizedRow, NormalizedSeries, RawMarketChart, RawPoint};
