//! End-to-end pipeline: decode, explain, assess, assemble.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::assemble::{assemble, pending_hash};
use crate::decode::Decoder;
use crate::error::CoreError;
use crate::explain::explain;
use crate::registry::SignatureRegistry;
use crate::risk::{assess, AssessConfig, AssessRequest};
use crate::source::ChainDataSource;
use crate::types::{DecodedTransaction, IntentAnalysis, RawTransactionRequest, TransactionContext};

/// Full result of analyzing one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub context: TransactionContext,
    pub intent: IntentAnalysis,
    pub decoded: DecodedTransaction,
}

/// Owns the registry and data source shared by every analysis. Cheap to
/// share behind an `Arc`; analyses hold no state between calls.
pub struct Analyzer {
    registry: SignatureRegistry,
    source: Arc<dyn ChainDataSource>,
    config: AssessConfig,
}

impl Analyzer {
    pub fn new(
        registry: SignatureRegistry,
        source: Arc<dyn ChainDataSource>,
        config: AssessConfig,
    ) -> Self {
        Self {
            registry,
            source,
            config,
        }
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Analyze a pending request. `hash` defaults to a digest of the request
    /// when the wallet has not assigned one. Fails only when the request
    /// itself is unusable (missing or malformed recipient or value).
    pub async fn analyze(
        &self,
        request: &RawTransactionRequest,
        hash: Option<&str>,
        timestamp: u64,
    ) -> Result<Analysis, CoreError> {
        let decoded = Decoder::new(&self.registry).decode(request)?;
        let intent = explain(&decoded);
        let indicators = assess(
            self.source.as_ref(),
            &AssessRequest::from_decoded(&decoded),
            &self.config,
        )
        .await;

        let hash = hash
            .filter(|h| !h.trim().is_empty())
            .map_or_else(|| pending_hash(request), str::to_owned);
        let context = assemble(&hash, &decoded, &intent, indicators, timestamp);
        info!(
            hash = %context.hash,
            kind = %context.kind,
            indicators = context.risk_indicators.len(),
            warnings = context.warning_count(),
            "transaction analyzed"
        );

        Ok(Analysis {
            context,
            intent,
            decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy::primitives::{Address, U256};

    use super::*;
    use crate::source::mock::MockSource;
    use crate::source::ContractVerification;
    use crate::test_util::{addr, calldata, encode_address, encode_uint, raw_request};
    use crate::types::{Confidence, Severity, TxKind};

    fn analyzer(source: MockSource) -> Analyzer {
        Analyzer::new(
            SignatureRegistry::standard(),
            Arc::new(source),
            AssessConfig::default(),
        )
    }

    #[tokio::test]
    async fn native_transfer_end_to_end() {
        let analyzer = analyzer(MockSource::builder().build());
        let analysis = analyzer
            .analyze(&raw_request(addr(0x42), "0x16345785d8a0000", "0x"), Some("0xfeed"), 7)
            .await
            .unwrap();
        assert_eq!(analysis.context.hash, "0xfeed");
        assert_eq!(analysis.context.kind, TxKind::Transfer);
        assert_eq!(analysis.context.confidence, Confidence::High);
        assert_eq!(analysis.context.risk_indicators.len(), 1);
        assert_eq!(
            analysis.context.risk_indicators[0].message,
            "Simple ETH transfer to wallet address"
        );
        assert_eq!(analysis.context.timestamp, 7);
        assert_eq!(analysis.intent.intent, analysis.context.intent);
    }

    #[tokio::test]
    async fn approval_assesses_token_contract() {
        let usdc = Address::from_str("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap();
        let source = MockSource::builder()
            .with_contract(usdc, ContractVerification::Verified { contract_name: None })
            .build();
        let data = calldata("095ea7b3", &[encode_address(addr(0x33)), encode_uint(U256::MAX)]);
        let analysis = analyzer(source)
            .analyze(&raw_request(usdc, "0x0", &data), None, 1)
            .await
            .unwrap();

        assert!(analysis.context.intent.contains("unlimited"));
        assert!(analysis.context.hash.starts_with("0x"));
        let indicators = &analysis.context.risk_indicators;
        assert_eq!(indicators[0].severity, Severity::Info);
        assert_eq!(indicators.len(), 2, "verification and exchange activity only");
    }

    #[tokio::test]
    async fn blank_hash_uses_request_digest() {
        let analyzer = analyzer(MockSource::builder().build());
        let req = raw_request(addr(0x42), "0x1", "0x");
        let analysis = analyzer.analyze(&req, Some("  "), 1).await.unwrap();
        assert_eq!(analysis.context.hash, pending_hash(&req));
    }

    #[tokio::test]
    async fn missing_recipient_is_rejected() {
        let analyzer = analyzer(MockSource::builder().build());
        let err = analyzer
            .analyze(&RawTransactionRequest::default(), None, 1)
            .await
            .expect_err("empty recipient must fail");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
