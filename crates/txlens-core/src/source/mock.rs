use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::error::SourceError;

use super::types::{ContractVerification, SortOrder, TxHistoryQuery, TxSummary};
use super::ChainDataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    HasCode,
    Verification,
    BlockNumber,
    History,
}

/// A mock chain data source for testing. Returns canned data populated via
/// the builder pattern and records which lookups were made.
pub struct MockSource {
    code: HashSet<Address>,
    verification: HashMap<Address, ContractVerification>,
    block_number: u64,
    histories: HashMap<Address, Vec<TxSummary>>,
    failing: HashSet<MockCall>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockSource {
    pub fn builder() -> MockSourceBuilder {
        MockSourceBuilder {
            code: HashSet::new(),
            verification: HashMap::new(),
            block_number: 20_000_000,
            histories: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) -> Result<(), SourceError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&call) {
            return Err(SourceError::Api {
                message: format!("mock failure for {call:?}"),
            });
        }
        Ok(())
    }
}

pub struct MockSourceBuilder {
    code: HashSet<Address>,
    verification: HashMap<Address, ContractVerification>,
    block_number: u64,
    histories: HashMap<Address, Vec<TxSummary>>,
    failing: HashSet<MockCall>,
}

impl MockSourceBuilder {
    pub fn with_contract(mut self, address: Address, verification: ContractVerification) -> Self {
        self.code.insert(address);
        self.verification.insert(address, verification);
        self
    }

    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }

    pub fn with_history(mut self, address: Address, txs: Vec<TxSummary>) -> Self {
        self.histories.insert(address, txs);
        self
    }

    pub fn failing(mut self, call: MockCall) -> Self {
        self.failing.insert(call);
        self
    }

    pub fn build(self) -> MockSource {
        MockSource {
            code: self.code,
            verification: self.verification,
            block_number: self.block_number,
            histories: self.histories,
            failing: self.failing,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChainDataSource for MockSource {
    fn name(&self) -> &str {
        "Mock Explorer"
    }

    async fn has_code(&self, address: &Address) -> Result<bool, SourceError> {
        self.record(MockCall::HasCode)?;
        Ok(self.code.contains(address))
    }

    async fn contract_verification(
        &self,
        address: &Address,
    ) -> Result<ContractVerification, SourceError> {
        self.record(MockCall::Verification)?;
        Ok(self
            .verification
            .get(address)
            .cloned()
            .unwrap_or(ContractVerification::Inconclusive))
    }

    async fn block_number(&self) -> Result<u64, SourceError> {
        self.record(MockCall::BlockNumber)?;
        Ok(self.block_number)
    }

    async fn address_transactions(
        &self,
        address: &Address,
        query: &TxHistoryQuery,
    ) -> Result<Vec<TxSummary>, SourceError> {
        self.record(MockCall::History)?;
        let mut txs = self.histories.get(address).cloned().unwrap_or_default();
        txs.sort_by_key(|tx| tx.block_number);
        if query.sort == SortOrder::Desc {
            txs.reverse();
        }
        txs.truncate(query.page_size as usize);
        Ok(txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::addr;

    fn summary(from: u8, to: u8, block_number: u64) -> TxSummary {
        TxSummary {
            hash: None,
            from: addr(from),
            to: Some(addr(to)),
            block_number,
        }
    }

    #[tokio::test]
    async fn first_transaction_block_uses_oldest_entry() {
        let token = addr(0x10);
        let source = MockSource::builder()
            .with_history(token, vec![summary(1, 0x10, 300), summary(2, 0x10, 100)])
            .build();
        let first = source.first_transaction_block(&token).await.unwrap();
        assert_eq!(first, Some(100));
        assert_eq!(source.calls(), vec![MockCall::History]);
    }

    #[tokio::test]
    async fn latest_query_returns_newest_first() {
        let token = addr(0x10);
        let source = MockSource::builder()
            .with_history(
                token,
                vec![summary(1, 0x10, 1), summary(2, 0x10, 2), summary(3, 0x10, 3)],
            )
            .build();
        let txs = source
            .address_transactions(&token, &TxHistoryQuery::latest(2))
            .await
            .unwrap();
        let blocks: Vec<u64> = txs.iter().map(|tx| tx.block_number).collect();
        assert_eq!(blocks, vec![3, 2]);
    }

    #[tokio::test]
    async fn failing_call_returns_error() {
        let source = MockSource::builder().failing(MockCall::BlockNumber).build();
        assert!(source.block_number().await.is_err());
        assert!(!source.has_code(&addr(1)).await.unwrap());
    }
}
