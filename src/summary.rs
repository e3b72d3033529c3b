// =============================================================================
// Summary Reporter - read-only projections over an indicator series
// =============================================================================
//
// Point-in-time values come from the last row. Flow totals cover the whole
// series. The volume ratio compares mean volume over the trailing short and
// long windows, both measured back from the last row's timestamp, and is only
// reported once the series spans at least the long window.
// =============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorRow, IndicatorSeries};
use crate::signals::threshold_label;
use crate::types::{SortOrder, ThresholdLabel};

/// Default short window for the volume ratio, in days.
pub const DEFAULT_SHORT_WINDOW_DAYS: u32 = 7;
/// Default long window for the volume ratio, in days.
pub const DEFAULT_LONG_WINDOW_DAYS: u32 = 30;

/// Aggregate view of one indicator series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub latest_price: Option<f64>,
    pub latest_market_cap: Option<f64>,
    pub latest_volume_percent_mc: Option<f64>,
    pub latest_rsi: Option<f64>,
    /// Threshold label of the latest RSI.
    pub latest_label: ThresholdLabel,
    pub total_inflow: f64,
    pub total_outflow: f64,
    /// Short-window over long-window mean volume.
    pub volume_ratio: Option<f64>,
}

/// Summarize `series` with the given volume-ratio windows (in days).
pub fn summarize(series: &IndicatorSeries, short_window_days: u32, long_window_days: u32) -> SummaryStats {
    let Some(last) = series.last() else {
        return SummaryStats::default();
    };

    SummaryStats {
        latest_price: last.price,
        latest_market_cap: last.market_cap,
        latest_volume_percent_mc: last.volume_percent_mc,
        latest_rsi: last.rsi,
        latest_label: threshold_label(last.rsi),
        total_inflow: series.rows().iter().map(|r| r.inflow).sum(),
        total_outflow: series.rows().iter().map(|r| r.outflow).sum(),
        volume_ratio: volume_ratio(series.rows(), short_window_days, long_window_days),
    }
}

fn volume_ratio(rows: &[IndicatorRow], short_days: u32, long_days: u32) -> Option<f64> {
    let first = rows.first()?.timestamp;
    let last = rows.last()?.timestamp;
    if last - first < Duration::days(i64::from(long_days)) {
        return None;
    }

    let short = mean_volume_since(rows, last - Duration::days(i64::from(short_days)))?;
    let long = mean_volume_since(rows, last - Duration::days(i64::from(long_days)))?;
    if long == 0.0 {
        return Some(0.0);
    }
    Some(short / long)
}

fn mean_volume_since(rows: &[IndicatorRow], cutoff: DateTime<Utc>) -> Option<f64> {
    let (sum, count) = rows
        .iter()
        .rev()
        .take_while(|r| r.timestamp > cutoff)
        .fold((0.0, 0usize), |(s, n), r| (s + r.volume, n + 1));
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// Signal table
// ---------------------------------------------------------------------------

/// One display row of the threshold-label table. Numbers are rounded to two
/// decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub timestamp: DateTime<Utc>,
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub volume_percent_mc: Option<f64>,
    pub label: ThresholdLabel,
}

/// Build the threshold-label table in `order`, keeping at most `limit` rows.
pub fn signal_table(series: &IndicatorSeries, order: SortOrder, limit: usize) -> Vec<TableRow> {
    let to_row = |r: &IndicatorRow| TableRow {
        timestamp: r.timestamp,
        price: r.price.map(round2),
        rsi: r.rsi.map(round2),
        volume_percent_mc: r.volume_percent_mc.map(round2),
        label: threshold_label(r.rsi),
    };

    match order {
        SortOrder::Newest => series.rows().iter().rev().take(limit).map(to_row).collect(),
        SortOrder::Oldest => series.rows().iter().take(limit).map(to_row).collect(),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn daily(volumes: &[f64], rsi: Option<f64>) -> IndicatorSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rows = volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| IndicatorRow {
                timestamp: t0 + Duration::days(i as i64),
                price: Some(10.0 + i as f64 * 0.123),
                volume: v,
                market_cap: Some(1_000.0),
                volume_percent_mc: Some(v / 10.0),
                rsi,
                macd: 0.0,
                macd_signal: 0.0,
                macd_histogram: 0.0,
                price_change: None,
                inflow: i as f64,
                outflow: 1.0,
            })
            .collect::<Vec<_>>();
        IndicatorSeries::from(rows)
    }

    #[test]
    fn empty_series_summary() {
        let s = summarize(&IndicatorSeries::default(), 7, 30);
        assert_eq!(s, SummaryStats::default());
        assert_eq!(s.latest_label, ThresholdLabel::Hold);
    }

    #[test]
    fn latest_values_and_totals() {
        let series = daily(&[1.0, 2.0, 3.0], Some(25.0));
        let s = summarize(&series, 7, 30);
        assert_eq!(s.latest_price, Some(10.0 + 2.0 * 0.123));
        assert_eq!(s.latest_market_cap, Some(1_000.0));
        assert_eq!(s.latest_volume_percent_mc, Some(0.3));
        assert_eq!(s.latest_label, ThresholdLabel::Buy);
        assert_eq!(s.total_inflow, 3.0);
        assert_eq!(s.total_outflow, 3.0);
        // Three days is shorter than the long window.
        assert_eq!(s.volume_ratio, None);
    }

    #[test]
    fn volume_ratio_over_windows() {
        // 31 daily rows: last 7 have volume 20, the rest 10.
        let mut volumes = vec![10.0; 24];
        volumes.extend([20.0; 7]);
        let s = summarize(&daily(&volumes, Some(50.0)), 7, 30);
        // Long window = last 30 rows: 23 * 10 + 7 * 20 = 370 => mean 370/30
        let expected = 20.0 / (370.0 / 30.0);
        assert!((s.volume_ratio.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn volume_ratio_zero_denominator() {
        let s = summarize(&daily(&[0.0; 40], None), 7, 30);
        assert_eq!(s.volume_ratio, Some(0.0));
    }

    #[test]
    fn table_order_limit_and_rounding() {
        let series = daily(&[1.0, 2.0, 3.0, 4.0], Some(71.234));
        let newest = signal_table(&series, SortOrder::Newest, 2);
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].timestamp, series.rows()[3].timestamp);
        assert_eq!(newest[0].rsi, Some(71.23));
        assert_eq!(newest[0].label, ThresholdLabel::Sell);
        assert_eq!(newest[0].price, Some(10.37));

        let oldest = signal_table(&series, SortOrder::Oldest, 50);
        assert_eq!(oldest.len(), 4);
        assert_eq!(oldest[0].timestamp, series.rows()[0].timestamp);
    }
}
