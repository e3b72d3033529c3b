use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One `[epoch_ms, value]` observation as delivered by the market-data API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct RawPoint {
    pub epoch_ms: i64,
    pub value: f64,
}

impl RawPoint {
    pub fn new(epoch_ms: i64, value: f64) -> Self {
        Self { epoch_ms, value }
    }
}

impl From<(i64, f64)> for RawPoint {
    fn from((epoch_ms, value): (i64, f64)) -> Self {
        Self { epoch_ms, value }
    }
}

impl From<RawPoint> for (i64, f64) {
    fn from(p: RawPoint) -> Self {
        (p.epoch_ms, p.value)
    }
}

/// The three raw streams of one market-chart request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarketChart {
    pub prices: Vec<RawPoint>,
    pub total_volumes: Vec<RawPoint>,
    pub market_caps: Vec<RawPoint>,
}

// ---------------------------------------------------------------------------
// Normalized series
// ---------------------------------------------------------------------------

/// One joined, timestamped row.
///
/// Price and market cap are missing only on calendar days that daily
/// resampling fills in without samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub timestamp: DateTime<Utc>,
    pub price: Option<f64>,
    pub volume: f64,
    pub market_cap: Option<f64>,
    /// `volume / market_cap * 100`; `None` when market cap is zero.
    pub volume_percent_mc: Option<f64>,
}

/// Ascending, duplicate-free sequence of [`NormalizedRow`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedSeries {
    rows: Vec<NormalizedRow>,
}

impl NormalizedSeries {
    /// Wrap rows that are already ordered by ascending timestamp.
    pub(crate) fn from_sorted(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn prices(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.price).collect()
    }
}

/// `volume / market_cap * 100`, missing when the market cap is zero.
pub fn volume_percent_mc(volume: f64, market_cap: f64) -> Option<f64> {
    if market_cap == 0.0 {
        return None;
    }
    let pct = volume / market_cap * 100.0;
    pct.is_finite().then_some(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_point_deserialises_from_pair() {
        let points: Vec<RawPoint> = serde_json::from_str("[[1700000000000, 42.5]]").unwrap();
        assert_eq!(points, vec![RawPoint::new(1_700_000_000_000, 42.5)]);
    }

    #[test]
    fn market_chart_deserialises_coingecko_shape() {
        let json = r#"{
            "prices": [[1, 10.0], [2, 11.0]],
            "total_volumes": [[1, 5.0]],
            "market_caps": [[1, 100.0], [2, 110.0]]
        }"#;
        let chart: RawMarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.total_volumes[0].value, 5.0);
    }

    #[test]
    fn ratio_zero_market_cap_is_missing() {
        assert_eq!(volume_percent_mc(10.0, 0.0), None);
        let pct = volume_percent_mc(5.0, 200.0).unwrap();
        assert!((pct - 2.5).abs() < 1e-12);
    }
}
