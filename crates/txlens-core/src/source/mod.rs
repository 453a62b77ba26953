//! Chain data source abstraction.
//!
//! Defines the [`ChainDataSource`] trait consumed by the risk engine and
//! provides an Etherscan-compatible HTTP implementation
//! ([`ExplorerClient`]) plus a test mock (`mock::MockSource`).

mod explorer;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use explorer::ExplorerClient;
pub use types::{ContractVerification, SortOrder, TxHistoryQuery, TxSummary};

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::error::SourceError;

/// Read-only chain lookups needed to derive risk indicators.
///
/// Implementations own their transport concerns (timeouts, rate limits,
/// caching). They never retry on behalf of the caller.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Name reported as the `source` of indicators built from this data.
    fn name(&self) -> &str;

    /// Whether `address` currently has deployed bytecode.
    async fn has_code(&self, address: &Address) -> Result<bool, SourceError>;

    /// Published-source verification status of a contract.
    async fn contract_verification(
        &self,
        address: &Address,
    ) -> Result<ContractVerification, SourceError>;

    /// Current chain height.
    async fn block_number(&self) -> Result<u64, SourceError>;

    /// Transactions touching `address`, filtered by `query`.
    async fn address_transactions(
        &self,
        address: &Address,
        query: &TxHistoryQuery,
    ) -> Result<Vec<TxSummary>, SourceError>;

    /// Block of the earliest transaction touching `address`, or `None` when
    /// the address has no history.
    async fn first_transaction_block(&self, address: &Address) -> Result<Option<u64>, SourceError> {
        let txs = self
            .address_transactions(address, &TxHistoryQuery::earliest())
            .await?;
        Ok(txs.iter().map(|tx| tx.block_number).min())
    }
}
