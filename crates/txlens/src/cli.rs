use std::path::PathBuf;

use clap::Parser;

/// txlens: explains pending wallet transactions in plain language and flags
/// risk indicators before the user signs.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Etherscan-compatible explorer API URL.
    #[arg(
        long,
        default_value = "https://api.etherscan.io/api",
        env = "TXLENS_EXPLORER_URL"
    )]
    pub explorer_url: String,

    /// Explorer API key (optional; keyless access is heavily rate limited).
    #[arg(long, env = "TXLENS_EXPLORER_API_KEY")]
    pub explorer_api_key: Option<String>,

    /// Maximum explorer requests per second. Unlimited when omitted.
    #[arg(long, env = "TXLENS_EXPLORER_RPS")]
    pub explorer_rps: Option<u32>,

    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "3090")]
    pub port: u16,

    /// Browser origin allowed by CORS. Defaults to the server's own origin.
    #[arg(long)]
    pub cors_origin: Option<String>,

    /// Path to the decision ledger JSONL file for persistence.
    /// If omitted, decisions are in-memory only.
    #[arg(long, env = "TXLENS_LEDGER_FILE")]
    pub ledger_file: Option<PathBuf>,

    /// Default number of records returned by the recent-decisions endpoint.
    #[arg(long, default_value = "20")]
    pub recent_limit: usize,

    /// Tokens younger than this many days are flagged with a warning.
    #[arg(long, default_value = "7")]
    pub new_token_days: u64,

    /// Tokens younger than this many days get an informational note.
    #[arg(long, default_value = "30")]
    pub young_token_days: u64,

    /// Native value (ETH) above which a transaction is flagged with a warning.
    #[arg(long, default_value = "10")]
    pub high_value_eth: f64,

    /// Native value (ETH) above which a transaction gets an informational note.
    #[arg(long, default_value = "1")]
    pub medium_value_eth: f64,
}
