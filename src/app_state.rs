// =============================================================================
// Application State - shared by every request handler
// =============================================================================
//
// Immutable configuration and coin table plus the cached market-data source.
// The cache is the only interior-mutable part; analysis itself holds no state
// between requests.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::coingecko::{CachedCoinGecko, CoinGeckoClient};
use crate::coins::CoinRegistry;
use crate::runtime_config::AnalyzerConfig;

/// State shared across handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: AnalyzerConfig,
    pub registry: CoinRegistry,
    pub market: CachedCoinGecko,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Validate the coin table and build the market-data client.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let registry = config.registry()?;
        let client = CoinGeckoClient::new(
            config.coingecko_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("failed to build CoinGecko client")?;
        let market = CachedCoinGecko::new(client, Duration::from_secs(config.cache_ttl_secs));

        info!(
            coins = registry.len(),
            cache_ttl_secs = config.cache_ttl_secs,
            base_url = %config.coingecko_base_url,
            "application state initialised"
        );

        Ok(Self {
            config,
            registry,
            market,
            started_at: Utc::now(),
        })
    }
}
