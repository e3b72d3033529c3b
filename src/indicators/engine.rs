// =============================================================================
// Indicator Engine - derive RSI, MACD and flow columns for a normalized series
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::flow::{calculate_price_change, flow};
use super::macd::calculate_macd;
use super::rsi::calculate_rsi;
use crate::market_data::NormalizedSeries;
use crate::types::RsiMethod;

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

/// Look-back parameters for every derived column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default)]
    pub rsi_method: RsiMethod,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            rsi_method: RsiMethod::default(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

/// A normalized row plus every derived indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub price: Option<f64>,
    pub volume: f64,
    pub market_cap: Option<f64>,
    pub volume_percent_mc: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    /// Percent change from the previous row.
    pub price_change: Option<f64>,
    pub inflow: f64,
    pub outflow: f64,
}

/// Immutable, timestamp-ordered indicator output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

impl From<Vec<IndicatorRow>> for IndicatorSeries {
    /// Rows are expected in ascending timestamp order.
    fn from(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }
}

/// Compute indicators with the default parameters (RSI 14 SMA, MACD 12/26/9).
pub fn compute_indicators(series: &NormalizedSeries) -> IndicatorSeries {
    compute_indicators_with(series, &IndicatorParams::default())
}

/// Compute indicators with explicit parameters. Empty input yields an empty
/// series.
pub fn compute_indicators_with(series: &NormalizedSeries, params: &IndicatorParams) -> IndicatorSeries {
    if series.is_empty() {
        return IndicatorSeries::default();
    }

    let prices = series.prices();
    let rsi = calculate_rsi(&prices, params.rsi_period, params.rsi_method);
    let macd = calculate_macd(&prices, params.macd_fast, params.macd_slow, params.macd_signal);
    let price_change = calculate_price_change(&prices);

    let rows: Vec<IndicatorRow> = series
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (inflow, outflow) = flow(row.volume, price_change[i]);
            IndicatorRow {
                timestamp: row.timestamp,
                price: row.price,
                volume: row.volume,
                market_cap: row.market_cap,
                volume_percent_mc: row.volume_percent_mc,
                rsi: rsi[i],
                // Zero spans leave the MACD lines empty; treat them as flat.
                macd: macd.macd.get(i).copied().unwrap_or(0.0),
                macd_signal: macd.signal.get(i).copied().unwrap_or(0.0),
                macd_histogram: macd.histogram.get(i).copied().unwrap_or(0.0),
                price_change: price_change[i],
                inflow,
                outflow,
            }
        })
        .collect();

    debug!(
        rows = rows.len(),
        rsi_method = %params.rsi_method,
        rsi_period = params.rsi_period,
        "indicators computed"
    );

    IndicatorSeries { rows }
}
