mod analyze;
mod auth;
mod decisions;
mod error;
mod scenarios;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{any, get, post};
use axum::{Json, Router};
use eyre::WrapErr;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use txlens_core::ledger::DecisionLedger;
use txlens_core::Analyzer;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub ledger: Arc<RwLock<DecisionLedger>>,
    pub api_token: String,
    pub default_recent_limit: usize,
}

type SharedState = Arc<AppState>;

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
}

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, origin: &str) -> eyre::Result<Router> {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches.
    let allowed: axum::http::HeaderValue = origin
        .parse()
        .wrap_err_with(|| format!("invalid CORS origin `{origin}`"))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |request_origin: &axum::http::HeaderValue, _| *request_origin == allowed,
        ))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static(auth::API_TOKEN_HEADER),
        ]);

    let shared = Arc::new(state);

    let public_api = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/scenarios", get(scenarios::list_scenarios))
        .route(
            "/api/v1/scenarios/{id}/analyze",
            post(analyze::analyze_scenario),
        )
        .route("/api/v1/analyze", post(analyze::analyze_transaction))
        .route("/api/v1/decisions/stats", get(decisions::decision_stats))
        .route("/api/v1/decisions/recent", get(decisions::recent_decisions));

    let protected_api = Router::new().route("/api/v1/decisions", post(decisions::log_decision));

    Ok(Router::new()
        .merge(public_api)
        .merge(protected_api)
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(cors)
        .with_state(shared))
}

async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "source": state.analyzer.source_name(),
        "signatures": state.analyzer.registry().len(),
    }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
