// =============================================================================
// Analysis Pipeline - one pass from raw streams to signals and summary
// =============================================================================
//
//   raw chart -> normalize -> compute_indicators_with -> detect_signals
//                                                    \-> summarize
//
// Pure and synchronous; identical inputs give identical output, which is what
// makes caching the raw fetch upstream safe.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::indicators::{compute_indicators_with, IndicatorParams, IndicatorSeries};
use crate::market_data::{normalize_chart, RawMarketChart};
use crate::runtime_config::AnalyzerConfig;
use crate::signals::{detect_signals, Signal};
use crate::summary::{summarize, SummaryStats};
use crate::types::View;

/// Everything derived for one coin and range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinAnalysis {
    pub view: View,
    pub days: u32,
    pub series: IndicatorSeries,
    pub signals: Vec<Signal>,
    pub summary: SummaryStats,
}

/// Run the full pipeline for `chart` with the configuration's indicator
/// parameters.
pub fn analyze(chart: &RawMarketChart, view: View, days: u32, config: &AnalyzerConfig) -> Result<CoinAnalysis> {
    analyze_with(chart, view, days, config, &config.indicators)
}

/// [`analyze`] with indicator parameters overridden for this request.
pub fn analyze_with(
    chart: &RawMarketChart,
    view: View,
    days: u32,
    config: &AnalyzerConfig,
    params: &IndicatorParams,
) -> Result<CoinAnalysis> {
    let policy = config.resample_policy(view, days);
    let normalized = normalize_chart(chart, &policy)?;
    let series = compute_indicators_with(&normalized, params);
    let signals = detect_signals(&series);
    let summary = summarize(&series, config.short_window_days, config.long_window_days);

    debug!(
        view = ?view,
        days,
        rows = series.len(),
        signals = signals.len(),
        "analysis complete"
    );

    Ok(CoinAnalysis {
        view,
        days,
        series,
        signals,
        summary,
    })
}
