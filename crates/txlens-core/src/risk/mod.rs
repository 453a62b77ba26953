//! Risk indicator engine.
//!
//! [`assess`] runs the contract, token-age, exchange-activity and value
//! checks against an injected [`ChainDataSource`] and always returns a
//! list. Output order follows check order (contract, token age, exchange
//! activity, value) even though the two token lookups run concurrently.

mod checks;

pub use checks::{
    check_contract_verification, check_dex_activity, check_token_age, check_transaction_value,
    ContractCheck, ANALYSIS_SOURCE,
};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decode::parse_address;
use crate::error::CoreError;
use crate::labels::lower_hex;
use crate::source::ChainDataSource;
use crate::types::{DecodedTransaction, IndicatorType, RiskIndicator};
use crate::units::{parse_ether, wei_to_ether_exact};

/// Thresholds and lookup sizes used by the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessConfig {
    /// Assumed seconds between blocks when converting block spans to time.
    pub block_time_secs: u64,
    /// Tokens younger than this many days get a warning.
    pub new_token_days: u64,
    /// Tokens younger than this many days get an informational note.
    pub young_token_days: u64,
    /// Values above this many ETH get a warning. Compared exactly in wei.
    pub high_value_eth: f64,
    /// Values above this many ETH get an informational note.
    pub medium_value_eth: f64,
    /// Recent transactions scanned for exchange-router counterparties.
    pub history_page_size: u32,
}

impl Default for AssessConfig {
    fn default() -> Self {
        Self {
            block_time_secs: 12,
            new_token_days: 7,
            young_token_days: 30,
            high_value_eth: 10.0,
            medium_value_eth: 1.0,
            history_page_size: 100,
        }
    }
}

/// Inputs to one assessment. Addresses are strings as received from the
/// wallet; unparseable input degrades to a single warning indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRequest {
    pub recipient: String,
    #[serde(default)]
    pub token_address: Option<String>,
    /// Native value as a decimal ETH amount, e.g. `"0.1"`.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl AssessRequest {
    pub fn from_decoded(decoded: &DecodedTransaction) -> Self {
        Self {
            recipient: lower_hex(&decoded.to),
            token_address: decoded.token_address().map(|addr| lower_hex(&addr)),
            value: Some(wei_to_ether_exact(decoded.value)),
            data: Some(decoded.data.clone()),
        }
    }
}

fn is_contract_call(data: Option<&str>) -> bool {
    data.is_some_and(|data| {
        let data = data.trim();
        let payload = data.strip_prefix("0x").unwrap_or(data);
        payload.len() > 2
    })
}

/// Assess a pending transaction. Never fails: lookup failures become
/// warning indicators and an unusable request becomes a single
/// "unable to analyze" warning.
pub async fn assess(
    source: &dyn ChainDataSource,
    request: &AssessRequest,
    config: &AssessConfig,
) -> Vec<RiskIndicator> {
    match assess_inner(source, request, config).await {
        Ok(indicators) => indicators,
        Err(err) => {
            warn!(error = %err, "risk assessment aborted");
            vec![RiskIndicator::warning(
                IndicatorType::UnverifiedContract,
                "Unable to analyze risk indicators",
                ANALYSIS_SOURCE,
            )]
        }
    }
}

async fn assess_inner(
    source: &dyn ChainDataSource,
    request: &AssessRequest,
    config: &AssessConfig,
) -> Result<Vec<RiskIndicator>, CoreError> {
    let recipient = parse_address(&request.recipient)?;
    let value = request.value.as_deref().map(parse_ether).transpose()?;
    let token = request
        .token_address
        .as_deref()
        .map(parse_address)
        .transpose()?;
    let contract_call = is_contract_call(request.data.as_deref());
    debug!(%recipient, ?token, contract_call, "assessing transaction");

    let mut indicators = Vec::with_capacity(4);

    if contract_call {
        match check_contract_verification(source, &recipient).await {
            ContractCheck::NonContract(indicator) => return Ok(vec![indicator]),
            ContractCheck::Contract(indicator) => indicators.push(indicator),
        }
    }

    if let Some(token) = token {
        let (age, activity) = futures::join!(
            token_age(source, &token, &recipient, config),
            check_dex_activity(source, &token, config),
        );
        indicators.extend(age);
        indicators.push(activity);
    }

    if let Some(value) = value {
        indicators.extend(check_transaction_value(value, config));
    }

    if !contract_call && indicators.is_empty() {
        indicators.push(RiskIndicator::info(
            IndicatorType::UnverifiedContract,
            "Simple ETH transfer to wallet address",
            ANALYSIS_SOURCE,
        ));
    }

    Ok(indicators)
}

/// Token age only applies when the token differs from the recipient.
async fn token_age(
    source: &dyn ChainDataSource,
    token: &Address,
    recipient: &Address,
    config: &AssessConfig,
) -> Option<RiskIndicator> {
    if token == recipient {
        return None;
    }
    Some(check_token_age(source, token, config).await)
}
