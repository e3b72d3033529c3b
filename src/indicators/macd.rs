// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EWMA(price, fast) - EWMA(price, slow)
//   signal    = EWMA(MACD, signal_span)
//   histogram = MACD - signal
//
// All three lines have one value per price and are defined from the first
// sample because every EWMA is seeded on its first input. A missing price
// carries both price averages forward; rows before the first price are flat.

use serde::{Deserialize, Serialize};

use super::ema::{calculate_ewma, ewma_over_gaps};

/// MACD line, signal line and histogram, aligned with the input prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD for `prices`.
///
/// Returns empty lines when `prices` is empty or any span is zero.
pub fn calculate_macd(prices: &[Option<f64>], fast: usize, slow: usize, signal_span: usize) -> MacdLines {
    if prices.is_empty() || fast == 0 || slow == 0 || signal_span == 0 {
        return MacdLines::default();
    }

    let fast_ema = ewma_over_gaps(prices, fast);
    let slow_ema = ewma_over_gaps(prices, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => f - s,
            _ => 0.0,
        })
        .collect();
    let signal = calculate_ewma(&macd, signal_span);
    let histogram = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();

    MacdLines {
        macd,
        signal,
        histogram,
    }
}
