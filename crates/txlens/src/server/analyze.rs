use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use txlens_core::scenarios::find_scenario;
use txlens_core::{Analysis, RawTransactionRequest};

use super::error::{map_analysis_error, AppError};
use super::{now_millis, SharedState};

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct AnalyzeRequest {
    transaction: RawTransactionRequest,
    /// Wallet-assigned hash, when one exists.
    #[serde(default)]
    hash: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeResponse {
    #[serde(flatten)]
    analysis: Analysis,
    is_demo: bool,
}

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn analyze_transaction(
    State(state): State<SharedState>,
    req: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;

    let analysis = state
        .analyzer
        .analyze(&req.transaction, req.hash.as_deref(), now_millis())
        .await
        .map_err(map_analysis_error)?;

    Ok(Json(AnalyzeResponse {
        analysis,
        is_demo: false,
    }))
}

pub(super) async fn analyze_scenario(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let scenario =
        find_scenario(&id).ok_or_else(|| AppError::NotFound(format!("scenario not found: {id}")))?;

    let analysis = state
        .analyzer
        .analyze(&scenario.request, None, now_millis())
        .await
        .map_err(map_analysis_error)?;

    Ok(Json(AnalyzeResponse {
        analysis,
        is_demo: true,
    }))
}
