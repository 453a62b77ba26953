/// Failures raised while talking to an external chain-data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("explorer returned HTTP {status}")]
    Status { status: u16 },

    #[error("explorer API error: {message}")]
    Api { message: String },

    #[error("invalid explorer response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("chain data source failure: {0}")]
    Source(#[from] SourceError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid function signature `{signature}`: {message}")]
    InvalidSignature { signature: String, message: String },

    #[error("ledger record parse error at line {line}: {message}")]
    RecordParse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
