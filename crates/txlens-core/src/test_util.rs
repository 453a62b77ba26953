//! Shared test helpers for `txlens-core` unit tests.
//!
//! Builds deterministic addresses, ABI words and call data so decoder,
//! explainer and risk tests share one way of constructing wallet requests.

use alloy::primitives::{hex, Address, U256};

use crate::labels::lower_hex;
use crate::registry::selector_of;
use crate::types::RawTransactionRequest;

// ==============================================================================
// Address Helpers
// ==============================================================================

/// Create a deterministic address from a single repeated byte.
pub fn addr(b: u8) -> Address {
    Address::repeat_byte(b)
}

// ==============================================================================
// Call Data Builders
// ==============================================================================

/// Left-padded 32-byte ABI word for an address, as 64 hex characters.
pub fn encode_address(address: Address) -> String {
    format!("{:0>64}", hex::encode(address))
}

/// 32-byte ABI word for an unsigned integer, as 64 hex characters.
pub fn encode_uint(value: U256) -> String {
    format!("{:0>64}", format!("{value:x}"))
}

/// Hex selector for a prototype, without `0x`.
pub fn selector_hex(prototype: &str) -> String {
    hex::encode(selector_of(prototype))
}

/// `0x` + selector + concatenated argument words.
pub fn calldata(selector: &str, words: &[String]) -> String {
    format!("0x{selector}{}", words.concat())
}

pub fn raw_request(to: Address, value: &str, data: &str) -> RawTransactionRequest {
    RawTransactionRequest::new(lower_hex(&to), value, data)
}
