mod cli;
mod server;

use std::sync::Arc;

use alloy::primitives::hex;
use clap::Parser;
use eyre::WrapErr;

use txlens_core::ledger::DecisionLedger;
use txlens_core::risk::AssessConfig;
use txlens_core::source::{ChainDataSource, ExplorerClient};
use txlens_core::{Analyzer, SignatureRegistry};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    // Random API token for this server session.
    let api_token = {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().r#gen();
        hex::encode(bytes)
    };

    let explorer = ExplorerClient::new(
        &args.explorer_url,
        args.explorer_api_key.as_deref(),
        args.explorer_rps,
    )
    .wrap_err("configure explorer client")?;

    // The explorer is only needed for risk indicators, which degrade to
    // warnings when it is unreachable, so a failed probe does not stop startup.
    match explorer.block_number().await {
        Ok(height) => tracing::info!(
            explorer = explorer.name(),
            height,
            "connected to block explorer"
        ),
        Err(err) => tracing::warn!(
            "{}",
            format_explorer_probe_error(&args.explorer_url, &err.to_string())
        ),
    }
    if args.explorer_api_key.is_none() {
        tracing::warn!("no explorer API key configured; lookups may be throttled");
    }

    let ledger = match &args.ledger_file {
        Some(path) => DecisionLedger::open(path).wrap_err("load decision ledger")?,
        None => DecisionLedger::new(),
    };

    let config = AssessConfig {
        new_token_days: args.new_token_days,
        young_token_days: args.young_token_days,
        high_value_eth: args.high_value_eth,
        medium_value_eth: args.medium_value_eth,
        ..AssessConfig::default()
    };
    let analyzer = Analyzer::new(SignatureRegistry::standard(), Arc::new(explorer), config);

    let state = server::AppState {
        analyzer: Arc::new(analyzer),
        ledger: Arc::new(tokio::sync::RwLock::new(ledger)),
        api_token: api_token.clone(),
        default_recent_limit: args.recent_limit,
    };

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let origin = args
        .cors_origin
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}", args.bind, args.port));
    let router = server::build_router(state, &origin)?;

    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 and is accessible from the network");
    }

    println!();
    println!("  txlens is running:");
    println!("    API:       http://{bind_addr}/api/v1");
    println!("    Token:     {api_token}");
    println!();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err("bind TCP listener")?;

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("run HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn format_explorer_probe_error(explorer_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not reach explorer API `{explorer_url}`"),
        format!("explorer error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("Could not resolve host") {
        lines.push("hint: hostname resolution failed; verify the explorer URL and your network".into());
    } else if source_error.contains("HTTP 401") || source_error.contains("HTTP 403") {
        lines.push("hint: the explorer rejected the request; verify --explorer-api-key".into());
    } else if source_error.contains("HTTP 404") {
        lines.push("hint: endpoint path is invalid; the URL usually ends in `/api`".into());
    } else if source_error.contains("rate limit") {
        lines.push("hint: the explorer is throttling requests; set an API key or lower --explorer-rps".into());
    }
    lines.push("risk indicators will report lookups as unavailable until the explorer responds".into());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_adds_api_key_hint_on_forbidden() {
        let message =
            format_explorer_probe_error("https://api.etherscan.io/api", "explorer returned HTTP 403");
        assert!(message.contains("--explorer-api-key"));
        assert!(message.lines().count() >= 3);
    }

    #[test]
    fn probe_error_without_known_cause_has_no_hint() {
        let message = format_explorer_probe_error("https://x.test/api", "boom");
        assert!(!message.contains("hint:"));
    }
}
