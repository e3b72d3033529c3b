// =============================================================================
// CoinGecko REST API Client - market charts and coin snapshots
// =============================================================================
//
// Public endpoints only, no signing. Every request carries a timeout; a 429 is
// surfaced as `FetchError::RateLimited` so callers can tell throttling apart
// from other failures and from an empty-but-valid range.
// =============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::market_data::series::volume_percent_mc;
use crate::market_data::RawMarketChart;

/// Ranges at or below this many days are requested at hourly granularity.
const HOURLY_MAX_DAYS: u32 = 7;

/// Failures of the market-data collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("rate limited by market-data API")]
    RateLimited,

    #[error("market-data API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("market-data API error: {0}")]
    Api(String),

    #[error("malformed market-data response: {0}")]
    Malformed(String),
}

/// Current market figures for one coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap_change_percentage_30d: Option<f64>,
    /// Current volume as a percentage of market cap.
    pub volume_percent_mc: Option<f64>,
}

/// CoinGecko REST API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against `base_url` (e.g. `https://api.coingecko.com/api/v3`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        debug!(base_url = %base_url, "CoinGeckoClient initialised");

        Ok(Self { base_url, client })
    }

    /// URL of the market-chart endpoint for `coin_id` over `days`.
    pub fn market_chart_url(&self, coin_id: &str, days: u32) -> String {
        let interval = if days <= HOURLY_MAX_DAYS { "hourly" } else { "daily" };
        format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}&interval={}",
            self.base_url, coin_id, days, interval
        )
    }

    /// URL of the coin-detail endpoint for `coin_id`.
    pub fn coin_url(&self, coin_id: &str) -> String {
        format!(
            "{}/coins/{}?localization=false&tickers=false&community_data=false&developer_data=false&sparkline=false",
            self.base_url, coin_id
        )
    }

    // -------------------------------------------------------------------------
    // Endpoints
    // -------------------------------------------------------------------------

    /// GET /coins/{id}/market_chart - price, volume and market-cap streams.
    #[instrument(skip(self), name = "coingecko::market_chart")]
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<RawMarketChart, FetchError> {
        let body = self.get_json(&self.market_chart_url(coin_id, days)).await?;
        let chart = parse_market_chart(body)?;
        debug!(
            prices = chart.prices.len(),
            volumes = chart.total_volumes.len(),
            market_caps = chart.market_caps.len(),
            "market chart retrieved"
        );
        Ok(chart)
    }

    /// GET /coins/{id} - current price, market cap and volume.
    #[instrument(skip(self), name = "coingecko::coin_snapshot")]
    pub async fn coin_snapshot(&self, coin_id: &str) -> Result<CoinSnapshot, FetchError> {
        let body = self.get_json(&self.coin_url(coin_id)).await?;
        parse_coin_snapshot(&body)
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(url, "market-data API rate limit hit");
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

// =============================================================================
// Response parsing
// =============================================================================

fn api_error(body: &Value) -> Option<String> {
    body.get("error").map(|e| match e {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Decode a market-chart payload.
pub fn parse_market_chart(body: Value) -> Result<RawMarketChart, FetchError> {
    if let Some(msg) = api_error(&body) {
        return Err(FetchError::Api(msg));
    }
    serde_json::from_value(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Decode a coin-detail payload.
pub fn parse_coin_snapshot(body: &Value) -> Result<CoinSnapshot, FetchError> {
    if let Some(msg) = api_error(body) {
        return Err(FetchError::Api(msg));
    }

    let market = &body["market_data"];
    let usd = |field: &str| market[field]["usd"].as_f64();

    let price = usd("current_price");
    let market_cap = usd("market_cap");
    let volume = usd("total_volume");
    let ratio = match (volume, market_cap) {
        (Some(v), Some(mc)) => volume_percent_mc(v, mc),
        _ => None,
    };

    Ok(CoinSnapshot {
        name: body["name"].as_str().unwrap_or("N/A").to_string(),
        symbol: body["symbol"].as_str().unwrap_or("N/A").to_uppercase(),
        price,
        market_cap,
        volume,
        market_cap_change_percentage_30d: market["market_cap_change_percentage_30d"].as_f64(),
        volume_percent_mc: ratio,
    })
}
