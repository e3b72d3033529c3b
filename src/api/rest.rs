// =============================================================================
// REST API Endpoints - Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only. The analysis core's
// "no data" outcome and the market-data collaborator's failures map to
// distinct status codes:
//
//   unknown coin / no data  -> 404
//   rate limited            -> 429
//   any other fetch failure -> 502
//
// CORS is permissive; the API serves public market data only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::coingecko::FetchError;
use crate::coins::CoinEntry;
use crate::error::AnalysisError;
use crate::indicators::{IndicatorParams, IndicatorSeries};
use crate::pipeline::{analyze, analyze_with};
use crate::signals::Signal;
use crate::summary::{signal_table, SummaryStats, TableRow};
use crate::types::{RsiMethod, SortOrder, View};

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/coins", get(coins))
        .route("/api/v1/coins/:coin/snapshot", get(snapshot))
        .route("/api/v1/coins/:coin/analysis", get(analysis))
        .route("/api/v1/compare", get(compare))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

/// Handler failure, rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub enum ApiError {
    UnknownCoin(String),
    NoData(String),
    BadRequest(String),
    Fetch(FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::UnknownCoin(coin) => (StatusCode::NOT_FOUND, format!("unknown coin: {coin}")),
            Self::NoData(coin) => (StatusCode::NOT_FOUND, format!("no data for {coin} in this range")),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Fetch(FetchError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                FetchError::RateLimited.to_string(),
            ),
            Self::Fetch(e) => {
                warn!(error = %e, "market-data fetch failed");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

fn resolve(state: &AppState, key: &str) -> Result<CoinEntry, ApiError> {
    state
        .registry
        .resolve(key)
        .cloned()
        .ok_or_else(|| ApiError::UnknownCoin(key.to_string()))
}

// =============================================================================
// Health & coin table
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    started_at: i64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        started_at: state.started_at.timestamp_millis(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

async fn coins(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.entries().to_vec())
}

// =============================================================================
// Snapshot
// =============================================================================

async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path(coin): Path<String>,
) -> Result<Response, ApiError> {
    let entry = resolve(&state, &coin)?;
    let snap = state.market.coin_snapshot(&entry.id).await?;
    Ok(Json(snap.as_ref().clone()).into_response())
}

// =============================================================================
// Single-coin analysis
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    days: Option<u32>,
    #[serde(default)]
    order: SortOrder,
    rsi: Option<RsiMethod>,
}

#[derive(Serialize)]
struct AnalysisResponse {
    coin: CoinEntry,
    days: u32,
    rsi_method: RsiMethod,
    series: IndicatorSeries,
    signals: Vec<Signal>,
    summary: SummaryStats,
    table: Vec<TableRow>,
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(coin): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Response, ApiError> {
    let entry = resolve(&state, &coin)?;
    let days = state.config.clamp_days(query.days);
    let params = IndicatorParams {
        rsi_method: query.rsi.unwrap_or(state.config.indicators.rsi_method),
        ..state.config.indicators
    };

    let chart = state.market.market_chart(&entry.id, days).await?;
    let result = match analyze_with(&chart, View::SingleCoin, days, &state.config, &params) {
        Ok(a) => a,
        Err(AnalysisError::DataGap) => return Err(ApiError::NoData(entry.id)),
    };

    info!(
        coin = %entry.id,
        days,
        rows = result.series.len(),
        signals = result.signals.len(),
        "analysis served"
    );

    let table = signal_table(&result.series, query.order, state.config.table_limit);
    Ok(Json(AnalysisResponse {
        coin: entry,
        days,
        rsi_method: params.rsi_method,
        series: result.series,
        signals: result.signals,
        summary: result.summary,
        table,
    })
    .into_response())
}

// =============================================================================
// Multi-coin comparison
// =============================================================================

#[derive(Debug, Deserialize)]
struct CompareQuery {
    coins: String,
    days: Option<u32>,
}

#[derive(Serialize)]
struct CompareEntry {
    coin: CoinEntry,
    /// `None` when the range has no data for this coin.
    summary: Option<SummaryStats>,
    rows: usize,
    signals: usize,
}

#[derive(Serialize)]
struct CompareResponse {
    days: u32,
    coins: Vec<CompareEntry>,
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Result<Response, ApiError> {
    let entries = query
        .coins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|key| resolve(&state, key))
        .collect::<Result<Vec<_>, _>>()?;
    if entries.is_empty() {
        return Err(ApiError::BadRequest("no coins requested".to_string()));
    }

    let days = state.config.clamp_days(query.days);
    let mut coins = Vec::with_capacity(entries.len());
    for entry in entries {
        let chart = state.market.market_chart(&entry.id, days).await?;
        let row = match analyze(&chart, View::MultiCoin, days, &state.config) {
            Ok(a) => CompareEntry {
                coin: entry,
                summary: Some(a.summary),
                rows: a.series.len(),
                signals: a.signals.len(),
            },
            Err(AnalysisError::DataGap) => {
                debug!(coin = %entry.id, days, "no overlapping data, summary omitted");
                CompareEntry {
                    coin: entry,
                    summary: None,
                    rows: 0,
                    signals: 0,
                }
            }
        };
        coins.push(row);
    }

    Ok(Json(CompareResponse { days, coins }).into_response())
}
