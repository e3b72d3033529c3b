// =============================================================================
// Shared types used across the analyzer
// =============================================================================

use serde::{Deserialize, Serialize};

/// Direction of a crossover event emitted by the signal detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

/// Coarse per-row label derived from the RSI level alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdLabel {
    Buy,
    Sell,
    Hold,
}

impl Default for ThresholdLabel {
    fn default() -> Self {
        Self::Hold
    }
}

/// Aggregation set used when a dense series is collapsed to daily bars.
///
/// `Mean` suits point analysis of a single coin; `Last` keeps end-of-day
/// price and market cap for flow accounting across several coins. Volume is
/// summed in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Last,
}

impl Default for Aggregation {
    fn default() -> Self {
        Self::Mean
    }
}

/// Which consumer a series is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    SingleCoin,
    MultiCoin,
}

impl Default for View {
    fn default() -> Self {
        Self::SingleCoin
    }
}

impl View {
    /// Aggregation set this view resamples with.
    pub fn aggregation(self) -> Aggregation {
        match self {
            Self::SingleCoin => Aggregation::Mean,
            Self::MultiCoin => Aggregation::Last,
        }
    }
}

/// RSI smoothing formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiMethod {
    /// Rolling simple mean of gains/losses with a shrinking warm-up window.
    Sma,
    /// Wilder-style exponential smoothing (`alpha = 1 / period`), undefined
    /// until `period` rows have been seen.
    Wilder,
}

impl Default for RsiMethod {
    fn default() -> Self {
        Self::Sma
    }
}

impl std::fmt::Display for RsiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma => write!(f, "sma"),
            Self::Wilder => write!(f, "wilder"),
        }
    }
}

/// Row order of the signal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Newest
    }
}
