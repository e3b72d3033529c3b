// =============================================================================
// Coin Lens - crypto market indicator & signal engine
// =============================================================================
//
// Core pipeline (pure, synchronous):
//
//   market_data::normalize -> indicators::compute_indicators
//                          -> signals::detect_signals -> summary::summarize
//
// Service shell: CoinGecko fetch + TTL cache, axum REST API.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod coingecko;
pub mod coins;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod runtime_config;
pub mod signals;
pub mod summary;
pub mod types;

pub use error::{AnalysisError, CoinTableError};
pub use indicators::{compute_indicators, compute_indicators_with, IndicatorParams, IndicatorSeries};
pub use market_data::{normalize, NormalizedSeries, RawPoint, ResamplePolicy};
pub use signals::{detect_signals, Signal};
pub use summary::{summarize, SummaryStats};
