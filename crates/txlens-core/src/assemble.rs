use alloy::primitives::{hex, keccak256};

use crate::types::{
    DecodedTransaction, IntentAnalysis, RawTransactionRequest, RiskIndicator, TransactionContext,
};

/// Combine decoder, explainer and risk-engine output into the review
/// artifact. Indicator order is preserved as given.
#[must_use]
pub fn assemble(
    hash: &str,
    decoded: &DecodedTransaction,
    intent: &IntentAnalysis,
    indicators: Vec<RiskIndicator>,
    timestamp: u64,
) -> TransactionContext {
    TransactionContext {
        hash: hash.to_owned(),
        kind: decoded.kind,
        recipient: decoded.to,
        value: decoded.value.to_string(),
        intent: intent.intent.clone(),
        estimated_outcome: intent.estimated_outcome.clone(),
        confidence: intent.confidence,
        details: intent.details.clone(),
        risk_indicators: indicators,
        timestamp,
    }
}

/// Stable identifier for a request that has no transaction hash yet.
///
/// Hashes the JSON form of the request, so identical requests map to the
/// same identifier.
#[must_use]
pub fn pending_hash(request: &RawTransactionRequest) -> String {
    let encoded = serde_json::to_vec(request).unwrap_or_default();
    format!("0x{}", hex::encode(keccak256(encoded)))
}
