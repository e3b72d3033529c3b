// =============================================================================
// Analyzer Configuration - JSON-backed settings with serde defaults
// =============================================================================
//
// Every tunable value of the analyzer lives here: the coin table, indicator
// look-backs, resample thresholds, summary windows and the market-data client
// settings. All fields carry `#[serde(default)]` so that a partial or older
// config file still loads.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coins::{default_coins, CoinEntry, CoinRegistry};
use crate::indicators::IndicatorParams;
use crate::market_data::ResamplePolicy;
use crate::summary::{DEFAULT_LONG_WINDOW_DAYS, DEFAULT_SHORT_WINDOW_DAYS};
use crate::types::View;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_single_coin_threshold() -> usize {
    1000
}

fn default_multi_coin_threshold() -> usize {
    500
}

fn default_short_window_days() -> u32 {
    DEFAULT_SHORT_WINDOW_DAYS
}

fn default_long_window_days() -> u32 {
    DEFAULT_LONG_WINDOW_DAYS
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_days() -> u32 {
    30
}

fn default_max_days() -> u32 {
    365
}

fn default_table_limit() -> usize {
    50
}

fn default_coingecko_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// AnalyzerConfig
// =============================================================================

/// Top-level configuration for the analyzer service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    // --- Coins ---------------------------------------------------------------

    /// Selectable coins; display names and ids must be unique.
    #[serde(default = "default_coins")]
    pub coins: Vec<CoinEntry>,

    // --- Indicators & resampling --------------------------------------------

    /// RSI / MACD look-backs and RSI smoothing method.
    #[serde(default)]
    pub indicators: IndicatorParams,

    /// Row count above which the single-coin view resamples.
    #[serde(default = "default_single_coin_threshold")]
    pub single_coin_threshold: usize,

    /// Row count above which the multi-coin view resamples.
    #[serde(default = "default_multi_coin_threshold")]
    pub multi_coin_threshold: usize,

    // --- Summary --------------------------------------------------------------

    /// Short volume-ratio window in days.
    #[serde(default = "default_short_window_days")]
    pub short_window_days: u32,

    /// Long volume-ratio window in days.
    #[serde(default = "default_long_window_days")]
    pub long_window_days: u32,

    /// Maximum rows in the signal table.
    #[serde(default = "default_table_limit")]
    pub table_limit: usize,

    // --- Requests -------------------------------------------------------------

    /// Range used when a request does not name one.
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Largest range a request may ask for.
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// How long fetched market data is reused.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// CoinGecko REST base URL.
    #[serde(default = "default_coingecko_base_url")]
    pub coingecko_base_url: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            coins: default_coins(),
            indicators: IndicatorParams::default(),
            single_coin_threshold: default_single_coin_threshold(),
            multi_coin_threshold: default_multi_coin_threshold(),
            short_window_days: default_short_window_days(),
            long_window_days: default_long_window_days(),
            table_limit: default_table_limit(),
            default_days: default_days(),
            max_days: default_max_days(),
            cache_ttl_secs: default_cache_ttl_secs(),
            coingecko_base_url: default_coingecko_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analyzer config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analyzer config from {}", path.display()))?;

        info!(
            path = %path.display(),
            coins = config.coins.len(),
            rsi_method = %config.indicators.rsi_method,
            "analyzer config loaded"
        );

        Ok(config)
    }

    /// Validated coin table.
    pub fn registry(&self) -> Result<CoinRegistry> {
        CoinRegistry::new(self.coins.clone()).context("invalid coin table in analyzer config")
    }

    /// Clamp a requested range to `1..=max_days`, defaulting when absent.
    pub fn clamp_days(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_days)
            .clamp(1, self.max_days.max(1))
    }

    /// Resample policy for `view` over a `days`-long range.
    pub fn resample_policy(&self, view: View, days: u32) -> ResamplePolicy {
        let threshold = match view {
            View::SingleCoin => self.single_coin_threshold,
            View::MultiCoin => self.multi_coin_threshold,
        };
        ResamplePolicy::new(threshold, view.aggregation(), days)
    }
}
