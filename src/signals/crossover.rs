// =============================================================================
// Crossover Signal Detector - RSI-gated MACD/signal-line crosses
// =============================================================================
//
// At row i (i >= 1):
//
//   Buy  : RSI_i < 30  AND MACD_i > SIG_i AND MACD_{i-1} <= SIG_{i-1}
//   Sell : RSI_i > 70  AND MACD_i < SIG_i AND MACD_{i-1} >= SIG_{i-1}
//
// The RSI gates are disjoint, so a row is never both. Rows whose RSI is
// undefined never fire.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};
use crate::indicators::IndicatorSeries;
use crate::types::SignalKind;

/// A detected crossover event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub price: Option<f64>,
    pub rsi: f64,
    pub kind: SignalKind,
}

/// Scan `series` for crossover events, in timestamp order.
pub fn detect_signals(series: &IndicatorSeries) -> Vec<Signal> {
    let rows = series.rows();
    let rsi: Vec<Option<f64>> = rows.iter().map(|r| r.rsi).collect();
    let macd: Vec<f64> = rows.iter().map(|r| r.macd).collect();
    let signal: Vec<f64> = rows.iter().map(|r| r.macd_signal).collect();

    let signals: Vec<Signal> = detect_crossovers(&rsi, &macd, &signal)
        .into_iter()
        .filter_map(|(i, kind)| {
            let row = &rows[i];
            Some(Signal {
                timestamp: row.timestamp,
                price: row.price,
                rsi: row.rsi?,
                kind,
            })
        })
        .collect();

    debug!(rows = rows.len(), signals = signals.len(), "crossover scan complete");
    signals
}

/// Slice-level crossover scan returning `(row index, kind)` pairs.
///
/// Only the common prefix of the three slices is scanned.
pub fn detect_crossovers(rsi: &[Option<f64>], macd: &[f64], signal: &[f64]) -> Vec<(usize, SignalKind)> {
    let n = rsi.len().min(macd.len()).min(signal.len());
    (1..n)
        .filter_map(|i| {
            let kind = crossover_at(rsi[i]?, macd[i - 1], signal[i - 1], macd[i], signal[i])?;
            Some((i, kind))
        })
        .collect()
}

fn crossover_at(rsi: f64, prev_macd: f64, prev_signal: f64, macd: f64, signal: f64) -> Option<SignalKind> {
    if rsi < OVERSOLD && macd > signal && prev_macd <= prev_signal {
        Some(SignalKind::Buy)
    } else if rsi > OVERBOUGHT && macd < signal && prev_macd >= prev_signal {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorRow;
    use chrono::{Duration, TimeZone};

    fn series(rsi: &[Option<f64>], macd: &[f64], signal: &[f64]) -> IndicatorSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let rows = (0..rsi.len())
            .map(|i| IndicatorRow {
                timestamp: t0 + Duration::days(i as i64),
                price: Some(100.0 + i as f64),
                volume: 1.0,
                market_cap: Some(1.0),
                volume_percent_mc: Some(100.0),
                rsi: rsi[i],
                macd: macd[i],
                macd_signal: signal[i],
                macd_histogram: macd[i] - signal[i],
                price_change: None,
                inflow: 0.0,
                outflow: 0.0,
            })
            .collect::<Vec<_>>();
        IndicatorSeries::from(rows)
    }

    #[test]
    fn buy_on_upward_cross_when_oversold() {
        let s = series(&[Some(25.0); 3], &[-1.0, -0.5, 0.2], &[0.0, 0.0, 0.0]);
        let signals = detect_signals(&s);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Buy);
        assert_eq!(signals[0].timestamp, s.rows()[2].timestamp);
        assert_eq!(signals[0].price, Some(102.0));
        assert_eq!(signals[0].rsi, 25.0);
    }

    #[test]
    fn sell_on_downward_cross_when_overbought() {
        let s = series(&[Some(80.0); 3], &[1.0, 0.0, -0.1], &[0.0, 0.0, 0.0]);
        let signals = detect_signals(&s);
        // Row 1 is not strictly below; row 2 crosses from "at" to below.
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Sell);
        assert_eq!(signals[0].timestamp, s.rows()[2].timestamp);
    }

    #[test]
    fn cross_without_rsi_gate_is_ignored() {
        let s = series(&[Some(50.0); 3], &[-1.0, -0.5, 0.2], &[0.0; 3]);
        assert!(detect_signals(&s).is_empty());
    }

    #[test]
    fn undefined_rsi_never_fires() {
        let s = series(&[None, None, None], &[-1.0, -0.5, 0.2], &[0.0; 3]);
        assert!(detect_signals(&s).is_empty());
    }

    #[test]
    fn first_row_never_fires() {
        let s = series(&[Some(10.0)], &[1.0], &[0.0]);
        assert!(detect_signals(&s).is_empty());
    }

    #[test]
    fn staying_above_is_not_a_cross() {
        let s = series(&[Some(20.0); 4], &[1.0, 2.0, 3.0, 4.0], &[0.0; 4]);
        assert!(detect_signals(&s).is_empty());
    }

    #[test]
    fn empty_series_yields_no_signals() {
        assert!(detect_signals(&IndicatorSeries::default()).is_empty());
    }

    #[test]
    fn slice_scan_reports_indices() {
        let rsi = [Some(20.0), Some(20.0), Some(75.0), Some(75.0)];
        let macd = [-1.0, 1.0, 2.0, -1.0];
        let signal = [0.0; 4];
        assert_eq!(
            detect_crossovers(&rsi, &macd, &signal),
            vec![(1, SignalKind::Buy), (3, SignalKind::Sell)]
        );
    }

    #[test]
    fn every_hit_satisfies_its_rsi_gate() {
        // MACD flips around a flat signal line every row: odd rows cross up,
        // even rows cross down. RSI 37 * i mod 101, missing every 11th row.
        let rsi: Vec<Option<f64>> = (0..200)
            .map(|i| (i % 11 != 0).then(|| (i * 37 % 101) as f64))
            .collect();
        let macd: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { -1.0 } else { 1.0 }).collect();
        let signal = vec![0.0; 200];

        let hits = detect_crossovers(&rsi, &macd, &signal);
        // i = 3 -> RSI 10 on an upward cross; i = 2 -> RSI 74 on a downward cross.
        assert!(hits.contains(&(3, SignalKind::Buy)));
        assert!(hits.contains(&(2, SignalKind::Sell)));
        assert!(hits.iter().all(|(i, _)| rsi[*i].is_some()));
        for &(i, kind) in &hits {
            let r = rsi[i].unwrap();
            match kind {
                SignalKind::Buy => {
                    assert!(r < OVERSOLD, "buy at {i} with RSI {r}");
                    assert!(macd[i] > signal[i] && macd[i - 1] <= signal[i - 1]);
                }
                SignalKind::Sell => {
                    assert!(r > OVERBOUGHT, "sell at {i} with RSI {r}");
                    assert!(macd[i] < signal[i] && macd[i - 1] >= signal[i - 1]);
                }
            }
        }
    }
}
