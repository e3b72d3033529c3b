// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators derived from a
// normalized price/volume series. Empty or short input never fails: it yields
// empty output or `None` entries.

pub mod ema;
pub mod engine;
pub mod flow;
pub mod macd;
pub mod rsi;

pub use engine::{compute_indicators, compute_indicators_with, IndicatorParams, IndicatorRow, IndicatorSeries};
