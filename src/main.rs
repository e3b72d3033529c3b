// =============================================================================
// Coin Lens - Main Entry Point
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coin_lens::api;
use coin_lens::app_state::AppState;
use coin_lens::runtime_config::AnalyzerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("ANALYZER_CONFIG").unwrap_or_else(|_| "analyzer_config.json".into());
    let mut config = AnalyzerConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalyzerConfig::default()
    });

    if let Ok(url) = std::env::var("COINGECKO_BASE_URL") {
        config.coingecko_base_url = url;
    }

    info!(
        coins = ?config.coins.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        rsi_method = %config.indicators.rsi_method,
        "Configured coins"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let state = Arc::new(AppState::new(config)?);

    // ── 3. API server ────────────────────────────────────────────────────
    let bind_addr =
        std::env::var("ANALYZER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, api::router(state))
        .await
        .context("API server failed")?;

    Ok(())
}
