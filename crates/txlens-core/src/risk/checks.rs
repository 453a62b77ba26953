//! Individual risk checks.
//!
//! Each check consults the data source, keeps any failure as an explicit
//! `Result`, and maps every outcome (including failure) to an indicator.
//! No check can fail the assessment as a whole.

use alloy::primitives::{Address, U256};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::labels::{self, LabelKind};
use crate::source::{ChainDataSource, ContractVerification, TxHistoryQuery};
use crate::types::{IndicatorType, RiskIndicator};
use crate::units::{format_ether, parse_ether};

use super::AssessConfig;

pub const ANALYSIS_SOURCE: &str = "Transaction Analysis";

const SECONDS_PER_DAY: u64 = 86_400;

// ==============================================================================
// Contract Verification
// ==============================================================================

/// Outcome of the contract check. `NonContract` ends the assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCheck {
    Contract(RiskIndicator),
    NonContract(RiskIndicator),
}

pub async fn check_contract_verification(
    source: &dyn ChainDataSource,
    recipient: &Address,
) -> ContractCheck {
    match source.has_code(recipient).await {
        Ok(false) => {
            debug!(%recipient, "call data sent to address without code");
            return ContractCheck::NonContract(RiskIndicator::warning(
                IndicatorType::UnverifiedContract,
                "Transaction data sent to non-contract address; the recipient has no code to run it",
                source.name(),
            ));
        }
        Ok(true) => {}
        Err(err) => {
            warn!(%recipient, error = %err, "contract code lookup failed");
            return ContractCheck::Contract(verification_fallback(source, recipient));
        }
    }

    let indicator = match source.contract_verification(recipient).await {
        Ok(ContractVerification::Verified { contract_name }) => {
            let message = match contract_name {
                Some(name) => format!("Contract source code is verified ({name})"),
                None => "Contract source code is verified".to_owned(),
            };
            RiskIndicator::info(IndicatorType::UnverifiedContract, message, source.name())
        }
        Ok(ContractVerification::Unverified) => RiskIndicator::warning(
            IndicatorType::UnverifiedContract,
            "Contract source code is not verified, so its behavior cannot be reviewed publicly",
            source.name(),
        ),
        Ok(ContractVerification::Inconclusive) => {
            debug!(%recipient, "verification lookup inconclusive");
            verification_fallback(source, recipient)
        }
        Err(err) => {
            warn!(%recipient, error = %err, "verification lookup failed");
            verification_fallback(source, recipient)
        }
    };
    ContractCheck::Contract(indicator)
}

/// Known-protocol table consulted only when the live lookup could not
/// answer. A confirmed "unverified" answer is never overridden.
fn verification_fallback(source: &dyn ChainDataSource, recipient: &Address) -> RiskIndicator {
    match labels::lookup(recipient) {
        Some(known) => {
            let what = match known.kind {
                LabelKind::Router => "exchange router",
                LabelKind::Token { .. } => "token contract",
                LabelKind::Protocol => "protocol contract",
            };
            RiskIndicator::info(
                IndicatorType::UnverifiedContract,
                format!("Known protocol: {} ({what}); live verification status unavailable", known.name),
                ANALYSIS_SOURCE,
            )
        }
        None => RiskIndicator::warning(
            IndicatorType::UnverifiedContract,
            "Unable to verify contract source code",
            source.name(),
        ),
    }
}

// ==============================================================================
// Token Age
// ==============================================================================

async fn token_age_days(
    source: &dyn ChainDataSource,
    token: &Address,
    config: &AssessConfig,
) -> Result<u64, SourceError> {
    let current = source.block_number().await?;
    let first = source
        .first_transaction_block(token)
        .await?
        .ok_or_else(|| SourceError::InvalidResponse("token has no transaction history".to_owned()))?;
    let elapsed_secs = current.saturating_sub(first).saturating_mul(config.block_time_secs);
    Ok(elapsed_secs / SECONDS_PER_DAY)
}

pub async fn check_token_age(
    source: &dyn ChainDataSource,
    token: &Address,
    config: &AssessConfig,
) -> RiskIndicator {
    match token_age_days(source, token, config).await {
        Ok(days) if days < config.new_token_days => RiskIndicator::warning(
            IndicatorType::NewToken,
            format!("Very new token: first activity {} ago", plural_days(days)),
            source.name(),
        ),
        Ok(days) if days < config.young_token_days => RiskIndicator::info(
            IndicatorType::NewToken,
            format!("Relatively new token: first activity {} ago", plural_days(days)),
            source.name(),
        ),
        Ok(days) => RiskIndicator::info(
            IndicatorType::NewToken,
            format!("Token first seen {} ago", plural_days(days)),
            source.name(),
        ),
        Err(err) => {
            warn!(%token, error = %err, "token age lookup failed");
            RiskIndicator::warning(
                IndicatorType::NewToken,
                "Unable to determine token age",
                source.name(),
            )
        }
    }
}

fn plural_days(days: u64) -> String {
    match days {
        0 => "less than a day".to_owned(),
        1 => "1 day".to_owned(),
        n => format!("{n} days"),
    }
}

// ==============================================================================
// Exchange Activity
// ==============================================================================

pub async fn check_dex_activity(
    source: &dyn ChainDataSource,
    token: &Address,
    config: &AssessConfig,
) -> RiskIndicator {
    let query = TxHistoryQuery::latest(config.history_page_size);
    match source.address_transactions(token, &query).await {
        Ok(txs) => {
            let router = labels::routers().find(|router| {
                router
                    .parsed()
                    .is_some_and(|addr| txs.iter().any(|tx| tx.involves(&addr)))
            });
            match router {
                Some(router) => RiskIndicator::info(
                    IndicatorType::NoDexPool,
                    format!("Token has recent trading activity on {}", router.name),
                    source.name(),
                ),
                None => RiskIndicator::warning(
                    IndicatorType::NoDexPool,
                    "No major exchange trading activity found for this token",
                    source.name(),
                ),
            }
        }
        Err(err) => {
            warn!(%token, error = %err, "token history lookup failed");
            RiskIndicator::warning(
                IndicatorType::NoDexPool,
                "Unable to verify exchange trading activity",
                source.name(),
            )
        }
    }
}

// ==============================================================================
// Value Magnitude
// ==============================================================================

/// Ether threshold in wei. A threshold with no exact wei form (negative,
/// non-finite, finer than one wei) never triggers.
fn threshold_wei(eth: f64) -> U256 {
    parse_ether(&eth.to_string()).unwrap_or(U256::MAX)
}

/// Pure value check on the exact wei amount: `None` at or below the medium
/// threshold.
#[must_use]
pub fn check_transaction_value(value_wei: U256, config: &AssessConfig) -> Option<RiskIndicator> {
    let display = format_ether(value_wei);
    if value_wei > threshold_wei(config.high_value_eth) {
        Some(RiskIndicator::warning(
            IndicatorType::HighValue,
            format!("High value transaction: {display} ETH"),
            ANALYSIS_SOURCE,
        ))
    } else if value_wei > threshold_wei(config.medium_value_eth) {
        Some(RiskIndicator::info(
            IndicatorType::HighValue,
            format!("Medium value transaction: {display} ETH"),
            ANALYSIS_SOURCE,
        ))
    } else {
        None
    }
}
