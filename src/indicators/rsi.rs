// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================
//
// Step 1 - Per-step price deltas. The first row has no delta and counts as a
//          zero gain and a zero loss; so does any step into or out of a
//          missing price.
// Step 2 - gain = max(delta, 0), loss = max(-delta, 0).
// Step 3 - Smooth gains and losses, one of two ways:
//            Sma    : rolling mean over `period` rows, shrinking window while
//                     fewer than `period` rows exist (always defined).
//            Wilder : recursive EWM with alpha = 1 / period seeded on the first
//                     row, undefined until `period` rows have been seen.
// Step 4 - RS  = avg_gain / avg_loss   (avg_loss == 0 => RS = +inf)
//          RSI = 100 - 100 / (1 + RS)  (so avg_loss == 0 => RSI = 100)
//
// Thresholds:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

use super::ema::ewma_with_alpha;
use crate::types::RsiMethod;

/// RSI below this level is oversold.
pub const OVERSOLD: f64 = 30.0;
/// RSI above this level is overbought.
pub const OVERBOUGHT: f64 = 70.0;

/// Compute RSI for `prices` with the chosen smoothing `method`.
///
/// The output has one entry per price. `period == 0` yields all `None`.
pub fn calculate_rsi(prices: &[Option<f64>], period: usize, method: RsiMethod) -> Vec<Option<f64>> {
    match method {
        RsiMethod::Sma => sma_rsi(prices, period),
        RsiMethod::Wilder => wilder_rsi(prices, period),
    }
}

/// RSI from rolling simple means with `min_periods = 1`.
pub fn sma_rsi(prices: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let (gains, losses) = gains_and_losses(prices);
    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| rsi_from_averages(g, l))
        .collect()
}

/// RSI from Wilder-style exponential smoothing, gated by `min_periods = period`.
pub fn wilder_rsi(prices: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let (gains, losses) = gains_and_losses(prices);
    let alpha = 1.0 / period as f64;
    let avg_gain = ewma_with_alpha(&gains, alpha);
    let avg_loss = ewma_with_alpha(&losses, alpha);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .enumerate()
        .map(|(i, (&g, &l))| {
            if i + 1 < period {
                None
            } else {
                rsi_from_averages(g, l)
            }
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

fn gains_and_losses(prices: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());

    if !prices.is_empty() {
        gains.push(0.0);
        losses.push(0.0);
    }
    for w in prices.windows(2) {
        let delta = match (w[0], w[1]) {
            (Some(prev), Some(cur)) => cur - prev,
            _ => 0.0,
        };
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    (gains, losses)
}

/// Trailing mean over at most `window` values ending at each index.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Zero average loss saturates at 100, including the no-movement case.
/// Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
