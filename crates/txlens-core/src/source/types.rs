use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Outcome of a contract-source lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContractVerification {
    Verified { contract_name: Option<String> },
    Unverified,
    /// The source answered but did not say either way (empty result,
    /// unknown address).
    Inconclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters for an address-history lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHistoryQuery {
    pub sort: SortOrder,
    pub page: u32,
    pub page_size: u32,
    pub start_block: u64,
    pub end_block: Option<u64>,
}

impl TxHistoryQuery {
    /// The single oldest transaction.
    pub fn earliest() -> Self {
        Self {
            sort: SortOrder::Asc,
            page: 1,
            page_size: 1,
            start_block: 0,
            end_block: None,
        }
    }

    /// The `page_size` newest transactions.
    pub fn latest(page_size: u32) -> Self {
        Self {
            sort: SortOrder::Desc,
            page: 1,
            page_size,
            start_block: 0,
            end_block: None,
        }
    }
}

/// Transaction summary returned by history lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSummary {
    pub hash: Option<String>,
    pub from: Address,
    /// `None` for contract creations.
    pub to: Option<Address>,
    pub block_number: u64,
}

impl TxSummary {
    /// Whether `address` is the sender or the receiver.
    pub fn involves(&self, address: &Address) -> bool {
        self.from == *address || self.to.as_ref() == Some(address)
    }
}
