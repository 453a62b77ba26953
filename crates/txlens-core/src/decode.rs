//! Calldata decoding against the signature registry.
//!
//! Malformed call data never fails a decode: an unknown selector or a
//! payload that does not fit its decode plan degrades to `TxKind::Unknown`
//! or to a decode without parameters. Only an unusable recipient or value
//! is reported as an error, since those make the request unreviewable.

use std::str::FromStr;

use alloy::primitives::{hex, Address, U256};
use tracing::debug;

use crate::error::CoreError;
use crate::registry::{ParamKind, Selector, SignatureRegistry};
use crate::types::{DecodedTransaction, ParamValue, RawTransactionRequest, TxKind};

const WORD: usize = 32;

/// Decodes raw wallet requests using an injected registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r SignatureRegistry,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r SignatureRegistry) -> Self {
        Self { registry }
    }

    pub fn decode(&self, request: &RawTransactionRequest) -> Result<DecodedTransaction, CoreError> {
        let to = parse_address(&request.to)?;
        let value = parse_quantity(&request.value)?;
        let data = normalize_data(&request.data);
        let payload = &data[2..];

        let mut decoded = DecodedTransaction {
            to,
            value,
            data: data.clone(),
            kind: TxKind::Unknown,
            selector: None,
            function_name: None,
            parameters: None,
        };

        // An empty payload or a lone null byte is a plain native transfer.
        if payload.len() <= 2 {
            decoded.kind = TxKind::Transfer;
            return Ok(decoded);
        }

        let Some(selector) = parse_selector(payload) else {
            debug!(data_len = payload.len(), "call data has no readable selector");
            return Ok(decoded);
        };
        decoded.selector = Some(hex::encode(selector));

        let Some(sig) = self.registry.lookup(&selector) else {
            debug!(selector = %hex::encode(selector), "selector not registered");
            return Ok(decoded);
        };

        decoded.kind = classify(&sig.prototype);
        decoded.function_name = Some(sig.prototype.clone());
        decoded.parameters = hex::decode(&payload[8..])
            .ok()
            .and_then(|args| decode_params(&sig.plan, &args));
        if decoded.parameters.is_none() {
            debug!(function = %sig.prototype, "call arguments do not match decode plan");
        }

        Ok(decoded)
    }
}

/// Parse a 20-byte hex address, with or without `0x` prefix.
pub fn parse_address(raw: &str) -> Result<Address, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(
            "transaction has no recipient; contract creation is not supported".to_owned(),
        ));
    }
    Address::from_str(trimmed)
        .map_err(|e| CoreError::InvalidInput(format!("invalid address `{trimmed}`: {e}")))
}

/// Parse a hex-encoded quantity. Empty input means zero.
pub fn parse_quantity(raw: &str) -> Result<U256, CoreError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| CoreError::InvalidInput(format!("invalid hex value `{trimmed}`: {e}")))
}

fn normalize_data(raw: &str) -> String {
    let trimmed = raw.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", payload.to_ascii_lowercase())
}

fn parse_selector(payload: &str) -> Option<Selector> {
    let mut selector = [0u8; 4];
    hex::decode_to_slice(payload.get(..8)?, &mut selector).ok()?;
    Some(selector)
}

fn classify(prototype: &str) -> TxKind {
    let name = prototype.split_once('(').map_or(prototype, |(name, _)| name);
    if name.contains("transfer") {
        TxKind::Transfer
    } else if name.contains("swap") {
        TxKind::Swap
    } else if name.contains("approve") {
        TxKind::Approval
    } else if name.contains("addLiquidity") || name.contains("removeLiquidity") {
        TxKind::Liquidity
    } else {
        TxKind::Unknown
    }
}

// ==============================================================================
// Parameter decoding
// ==============================================================================

fn decode_params(plan: &[ParamKind], args: &[u8]) -> Option<Vec<ParamValue>> {
    plan.iter()
        .enumerate()
        .map(|(index, kind)| {
            let head = word_at(args, index * WORD)?;
            match kind {
                ParamKind::Address => word_to_address(head).map(ParamValue::Address),
                ParamKind::Uint => Some(ParamValue::Uint(U256::from_be_slice(head))),
                ParamKind::AddressArray => {
                    decode_address_array(args, head).map(ParamValue::AddressArray)
                }
            }
        })
        .collect()
}

fn word_at(args: &[u8], offset: usize) -> Option<&[u8]> {
    args.get(offset..offset.checked_add(WORD)?)
}

fn word_to_address(word: &[u8]) -> Option<Address> {
    let (padding, body) = word.split_at(WORD - 20);
    padding
        .iter()
        .all(|b| *b == 0)
        .then(|| Address::from_slice(body))
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    let value = U256::from_be_slice(word);
    if value > U256::from(u32::MAX) {
        return None;
    }
    usize::try_from(value.as_limbs()[0]).ok()
}

/// Dynamic `address[]`: the head word is a byte offset (relative to the
/// argument block) to a length word followed by that many address words.
fn decode_address_array(args: &[u8], head: &[u8]) -> Option<Vec<Address>> {
    let offset = word_to_usize(head)?;
    let len = word_to_usize(word_at(args, offset)?)?;
    let start = offset.checked_add(WORD)?;
    if len > args.len().saturating_sub(start) / WORD {
        return None;
    }
    (0..len)
        .map(|i| word_to_address(word_at(args, start + i * WORD)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::STANDARD_PROTOTYPES;
    use crate::test_util::{addr, calldata, encode_address, encode_uint, raw_request};

    fn decode(req: &RawTransactionRequest) -> DecodedTransaction {
        let registry = SignatureRegistry::standard();
        Decoder::new(&registry).decode(req).expect("request must decode")
    }

    // -- native transfers --

    #[test]
    fn empty_data_is_native_transfer() {
        for data in ["", "0x", "0x00", "  0X  "] {
            let tx = decode(&raw_request(addr(0x11), "0x16345785d8a0000", data));
            assert_eq!(tx.kind, TxKind::Transfer, "data {data:?}");
            assert!(tx.function_name.is_none());
            assert!(tx.selector.is_none());
            assert_eq!(tx.value, U256::from(100_000_000_000_000_000u64));
        }
    }

    #[test]
    fn empty_value_is_zero() {
        let tx = decode(&raw_request(addr(0x11), "", "0x"));
        assert_eq!(tx.value, U256::ZERO);
        let tx = decode(&raw_request(addr(0x11), "0x", "0x"));
        assert_eq!(tx.value, U256::ZERO);
    }

    // -- registered calls --

    #[test]
    fn approve_decodes_spender_and_amount() {
        let data = calldata(
            "095ea7b3",
            &[encode_address(addr(0x22)), encode_uint(U256::MAX)],
        );
        let tx = decode(&raw_request(addr(0x11), "0x0", &data));
        assert_eq!(tx.kind, TxKind::Approval);
        assert_eq!(tx.selector.as_deref(), Some("095ea7b3"));
        assert_eq!(tx.function_name.as_deref(), Some("approve(address,uint256)"));
        assert_eq!(
            tx.parameters,
            Some(vec![
                ParamValue::Address(addr(0x22)),
                ParamValue::Uint(U256::MAX),
            ])
        );
    }

    #[test]
    fn transfer_from_classifies_as_transfer() {
        let data = calldata(
            "23b872dd",
            &[
                encode_address(addr(0x01)),
                encode_address(addr(0x02)),
                encode_uint(U256::from(5u64)),
            ],
        );
        let tx = decode(&raw_request(addr(0x11), "0x0", &data));
        assert_eq!(tx.kind, TxKind::Transfer);
        assert_eq!(tx.parameters.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn swap_decodes_address_path() {
        let path = [addr(0xaa), addr(0xbb)];
        let data = calldata(
            "7ff36ab5",
            &[
                encode_uint(U256::from(1_000u64)),
                encode_uint(U256::from(4 * 32u64)),
                encode_address(addr(0x33)),
                encode_uint(U256::from(1_700_000_000u64)),
                encode_uint(U256::from(path.len() as u64)),
                encode_address(path[0]),
                encode_address(path[1]),
            ],
        );
        let tx = decode(&raw_request(addr(0x11), "0xde0b6b3a7640000", &data));
        assert_eq!(tx.kind, TxKind::Swap);
        let params = tx.parameters.expect("swap params must decode");
        assert_eq!(params[1], ParamValue::AddressArray(path.to_vec()));
        assert_eq!(params[2], ParamValue::Address(addr(0x33)));
    }

    #[test]
    fn liquidity_functions_classify_as_liquidity() {
        let registry = SignatureRegistry::standard();
        for sig in registry.iter().filter(|s| s.prototype.contains("Liquidity")) {
            assert_eq!(classify(&sig.prototype), TxKind::Liquidity, "{}", sig.prototype);
        }
    }

    #[test]
    fn every_registered_selector_round_trips_with_zero_args() {
        let registry = SignatureRegistry::standard();
        for prototype in STANDARD_PROTOTYPES {
            let sig = registry
                .iter()
                .find(|s| s.prototype == *prototype)
                .expect("prototype must be registered");
            let data = format!("0x{}{}", sig.selector_hex(), "00".repeat(32 * sig.plan.len()));
            let tx = decode(&raw_request(addr(0x11), "0x0", &data));
            assert_eq!(tx.function_name.as_deref(), Some(*prototype));
            assert!(tx.parameters.is_some(), "{prototype} must decode zero args");
        }
    }

    // -- degradation --

    #[test]
    fn unknown_selector_is_unknown_without_function() {
        let tx = decode(&raw_request(addr(0x11), "0x1", "0x12345678"));
        assert_eq!(tx.kind, TxKind::Unknown);
        assert_eq!(tx.selector.as_deref(), Some("12345678"));
        assert!(tx.function_name.is_none());
        assert!(tx.parameters.is_none());
    }

    #[test]
    fn truncated_arguments_leave_parameters_absent() {
        let tx = decode(&raw_request(addr(0x11), "0x0", "0xa9059cbb0000"));
        assert_eq!(tx.kind, TxKind::Transfer);
        assert_eq!(tx.function_name.as_deref(), Some("transfer(address,uint256)"));
        assert!(tx.parameters.is_none());
    }

    #[test]
    fn non_hex_payload_does_not_fail() {
        let tx = decode(&raw_request(addr(0x11), "0x0", "0xzzzzzzzzzz"));
        assert_eq!(tx.kind, TxKind::Unknown);
        assert!(tx.selector.is_none());

        let tx = decode(&raw_request(addr(0x11), "0x0", "0xa9059cbbzz"));
        assert_eq!(tx.kind, TxKind::Transfer);
        assert!(tx.parameters.is_none());
    }

    #[test]
    fn dirty_address_padding_is_rejected() {
        let mut word = encode_address(addr(0x22));
        word.replace_range(0..2, "ff");
        let data = calldata("095ea7b3", &[word, encode_uint(U256::from(1u64))]);
        let tx = decode(&raw_request(addr(0x11), "0x0", &data));
        assert_eq!(tx.kind, TxKind::Approval);
        assert!(tx.parameters.is_none());
    }

    #[test]
    fn oversized_array_length_is_rejected() {
        let data = calldata(
            "7ff36ab5",
            &[
                encode_uint(U256::ZERO),
                encode_uint(U256::from(4 * 32u64)),
                encode_address(addr(0x33)),
                encode_uint(U256::ZERO),
                encode_uint(U256::from(1_000u64)),
            ],
        );
        let tx = decode(&raw_request(addr(0x11), "0x0", &data));
        assert_eq!(tx.kind, TxKind::Swap);
        assert!(tx.parameters.is_none());
    }

    // -- input validation --

    #[test]
    fn empty_recipient_is_rejected() {
        let registry = SignatureRegistry::standard();
        let err = Decoder::new(&registry)
            .decode(&RawTransactionRequest::new("", "0x0", "0x"))
            .expect_err("contract creation must be rejected");
        assert!(err.to_string().contains("no recipient"));
    }

    #[test]
    fn malformed_value_is_rejected() {
        let registry = SignatureRegistry::standard();
        let err = Decoder::new(&registry)
            .decode(&raw_request(addr(0x11), "0xnothex", "0x"))
            .expect_err("value must be hex");
        assert!(err.to_string().contains("invalid hex value"));
    }

    #[test]
    fn substitute_registry_changes_classification() {
        let registry =
            SignatureRegistry::from_prototypes(["approve(address,uint256)"]).expect("registry");
        let data = calldata(
            "a9059cbb",
            &[encode_address(addr(0x22)), encode_uint(U256::from(1u64))],
        );
        let tx = Decoder::new(&registry)
            .decode(&raw_request(addr(0x11), "0x0", &data))
            .expect("request must decode");
        assert_eq!(tx.kind, TxKind::Unknown);
    }
}
