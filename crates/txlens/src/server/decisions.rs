use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use txlens_core::decode::parse_address;
use txlens_core::ledger::{privacy_hash, DecisionLog, LedgerEntry, LedgerStats, RiskLevel};
use txlens_core::types::RiskIndicator;

use super::auth::check_auth;
use super::error::{map_ledger_error, AppError};
use super::{now_millis, SharedState};

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct LogDecisionRequest {
    transaction_hash: String,
    approved: bool,
    /// Address of the deciding user. Only its privacy hash is stored.
    user_address: String,
    /// Explicit risk level; derived from `risk_indicators` when absent.
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    risk_indicators: Vec<RiskIndicator>,
    #[serde(default)]
    is_demo: bool,
}

#[derive(Deserialize)]
pub(super) struct RecentQuery {
    limit: Option<usize>,
}

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn log_decision(
    State(state): State<SharedState>,
    headers: HeaderMap,
    req: Result<Json<LogDecisionRequest>, JsonRejection>,
) -> Result<Json<LedgerEntry>, AppError> {
    check_auth(&state.api_token, &headers)?;
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = parse_address(&req.user_address)
        .map_err(|e| AppError::BadRequest(format!("invalid userAddress: {e}")))?;
    let user_hash = privacy_hash(&user);
    let risk_level = match req.risk_level.as_deref() {
        Some(level) => level.to_owned(),
        None => RiskLevel::from_indicators(&req.risk_indicators)
            .as_str()
            .to_owned(),
    };

    let entry = state
        .ledger
        .write()
        .await
        .log_decision(DecisionLog {
            transaction_hash: &req.transaction_hash,
            user_hash: &user_hash,
            approved: req.approved,
            risk_level: &risk_level,
            timestamp: now_millis(),
            is_demo: req.is_demo,
        })
        .map_err(map_ledger_error)?;

    tracing::info!(
        id = entry.id,
        transaction_hash = %entry.transaction_hash,
        approved = entry.approved,
        risk_level = %entry.risk_level,
        is_demo = entry.is_demo,
        "decision logged"
    );
    Ok(Json(entry))
}

pub(super) async fn decision_stats(State(state): State<SharedState>) -> Json<LedgerStats> {
    Json(state.ledger.read().await.stats())
}

pub(super) async fn recent_decisions(
    State(state): State<SharedState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let limit = query.limit.unwrap_or(state.default_recent_limit);
    let entries = state
        .ledger
        .read()
        .await
        .recent(limit)
        .map_err(map_ledger_error)?;
    Ok(Json(entries))
}
