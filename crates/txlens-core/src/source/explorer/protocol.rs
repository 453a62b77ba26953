use crate::error::SourceError;

/// Response envelope shared by explorer modules.
///
/// `account` and `contract` actions answer with `status`/`message`/`result`;
/// `proxy` actions mirror JSON-RPC and answer with `result` or `error`.
#[derive(Debug, serde::Deserialize)]
pub(super) struct ExplorerResponse {
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) result: serde_json::Value,
    #[serde(default)]
    pub(super) error: Option<serde_json::Value>,
}

impl ExplorerResponse {
    /// Unwrap `result`, mapping explorer-level failures to `SourceError`.
    ///
    /// `status: "0"` with an empty result list is the explorer's way of
    /// saying "no transactions found" and is not an error.
    pub(super) fn into_result(self) -> Result<serde_json::Value, SourceError> {
        if let Some(err) = self.error {
            return Err(parse_rpc_error(err));
        }

        if self.status.as_deref() == Some("0") {
            if self.result.as_array().is_some_and(Vec::is_empty) {
                return Ok(self.result);
            }
            let message = self.message.unwrap_or_else(|| "NOTOK".to_owned());
            let detail = self
                .result
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| self.result.to_string());
            return Err(SourceError::Api {
                message: format!("{message}: {detail}"),
            });
        }

        Ok(self.result)
    }
}

/// Parse a proxy-module error object into a `SourceError`.
fn parse_rpc_error(err: serde_json::Value) -> SourceError {
    #[derive(serde::Deserialize)]
    struct RpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<RpcError>(err.clone()) {
        Ok(parsed) => SourceError::Api {
            message: format!("{} (code {})", parsed.message, parsed.code),
        },
        Err(_) => SourceError::InvalidResponse(format!("non-standard error object: {err}")),
    }
}
