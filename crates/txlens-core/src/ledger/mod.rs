//! Append-only decision ledger.
//!
//! Records the user's approve/reject choice for each reviewed transaction
//! together with the assessed risk level, keyed by a privacy hash of the
//! user's address. Entries can be persisted as JSONL and replayed on start.

mod jsonl;
mod store;
mod types;

pub use store::DecisionLedger;
pub use types::{
    DecisionLog, DecisionRecord, LedgerEntry, LedgerError, LedgerStats, RiskLevel, UserChoice,
    MAX_RECENT_DECISIONS,
};

use alloy::primitives::{hex, keccak256, Address};

use crate::labels::lower_hex;

/// One-way identifier for a user address. The raw address is never stored.
#[must_use]
pub fn privacy_hash(address: &Address) -> String {
    format!("0x{}", hex::encode(keccak256(lower_hex(address).as_bytes())))
}
