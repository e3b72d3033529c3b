// =============================================================================
// Signals Module
// =============================================================================
//
// Two independent labeling policies over an indicator series:
// - Crossover detection (RSI-gated MACD/signal-line crosses)
// - Threshold labels (RSI level only, one label per row)

pub mod crossover;
pub mod threshold;

pub use crossover::{detect_crossovers, detect_signals, Signal};
pub use threshold::{label_series, threshold_label};
