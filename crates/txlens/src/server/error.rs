use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use txlens_core::ledger::LedgerError;
use txlens_core::CoreError;

// ==============================================================================
// Error Type
// ==============================================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub(super) fn map_analysis_error(err: CoreError) -> AppError {
    match err {
        CoreError::InvalidInput(message) => AppError::BadRequest(message),
        other => AppError::Internal(format!("analyze transaction: {other}")),
    }
}

pub(super) fn map_ledger_error(err: LedgerError) -> AppError {
    match err {
        LedgerError::EmptyTransactionHash
        | LedgerError::EmptyUserHash
        | LedgerError::InvalidRiskLevel(_)
        | LedgerError::InvalidLimit => AppError::BadRequest(err.to_string()),
        LedgerError::Core(core) => AppError::Internal(format!("decision ledger: {core}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = map_analysis_error(CoreError::InvalidInput("no recipient".to_owned()));
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "no recipient"));
    }

    #[test]
    fn ledger_io_failure_is_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = map_ledger_error(LedgerError::Core(CoreError::Io(io)));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
