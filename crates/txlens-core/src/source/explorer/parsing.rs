use std::str::FromStr;

use alloy::primitives::Address;

use crate::error::SourceError;
use crate::source::types::{ContractVerification, TxSummary};

/// ABI placeholder the explorer returns for contracts without published source.
const NOT_VERIFIED_ABI: &str = "Contract source code not verified";

/// Parse a `0x`-prefixed hex quantity such as an `eth_blockNumber` result.
pub(super) fn parse_hex_u64(value: &serde_json::Value, field: &str) -> Result<u64, SourceError> {
    let raw = value
        .as_str()
        .ok_or_else(|| SourceError::InvalidResponse(format!("missing {field}")))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| SourceError::InvalidResponse(format!("{field} is not hex: {raw}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| SourceError::InvalidResponse(format!("invalid {field} `{raw}`: {e}")))
}

/// Interpret an `eth_getCode` result. Empty bytecode means an externally
/// owned account.
pub(super) fn parse_has_code(value: &serde_json::Value) -> Result<bool, SourceError> {
    let code = value
        .as_str()
        .ok_or_else(|| SourceError::InvalidResponse("missing bytecode".to_owned()))?;
    let body = code
        .strip_prefix("0x")
        .ok_or_else(|| SourceError::InvalidResponse(format!("bytecode is not hex: {code}")))?;
    Ok(!body.trim_start_matches('0').is_empty())
}

#[derive(serde::Deserialize)]
struct SourceCodeEntry {
    #[serde(rename = "SourceCode", default)]
    source_code: String,
    #[serde(rename = "ContractName", default)]
    contract_name: String,
    #[serde(rename = "ABI", default)]
    abi: String,
}

/// Interpret a `getsourcecode` result list.
pub(super) fn parse_verification(
    value: serde_json::Value,
) -> Result<ContractVerification, SourceError> {
    let entries: Vec<SourceCodeEntry> = serde_json::from_value(value)
        .map_err(|e| SourceError::InvalidResponse(format!("invalid getsourcecode result: {e}")))?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(ContractVerification::Inconclusive);
    };

    if !entry.source_code.trim().is_empty() {
        let name = entry.contract_name.trim();
        return Ok(ContractVerification::Verified {
            contract_name: (!name.is_empty()).then(|| name.to_owned()),
        });
    }
    if entry.abi.trim() == NOT_VERIFIED_ABI || entry.abi.trim().is_empty() {
        return Ok(ContractVerification::Unverified);
    }
    Ok(ContractVerification::Inconclusive)
}

#[derive(serde::Deserialize)]
struct TxListEntry {
    #[serde(default)]
    hash: Option<String>,
    from: String,
    #[serde(default)]
    to: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
}

/// Interpret a `txlist` result.
pub(super) fn parse_tx_list(value: serde_json::Value) -> Result<Vec<TxSummary>, SourceError> {
    let entries: Vec<TxListEntry> = serde_json::from_value(value)
        .map_err(|e| SourceError::InvalidResponse(format!("invalid txlist result: {e}")))?;

    entries
        .into_iter()
        .map(|entry| {
            let from = parse_address(&entry.from, "from")?;
            let to = if entry.to.is_empty() {
                None
            } else {
                Some(parse_address(&entry.to, "to")?)
            };
            let block_number = entry.block_number.parse::<u64>().map_err(|e| {
                SourceError::InvalidResponse(format!(
                    "invalid blockNumber `{}`: {e}",
                    entry.block_number
                ))
            })?;
            Ok(TxSummary {
                hash: entry.hash,
                from,
                to,
                block_number,
            })
        })
        .collect()
}

fn parse_address(raw: &str, field: &str) -> Result<Address, SourceError> {
    Address::from_str(raw)
        .map_err(|e| SourceError::InvalidResponse(format!("invalid {field} address `{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_u64_block_number() {
        let value = serde_json::json!("0x1312d00");
        assert_eq!(parse_hex_u64(&value, "block number").unwrap(), 20_000_000);
    }

    #[test]
    fn parse_hex_u64_rejects_decimal() {
        let value = serde_json::json!("12345");
        assert!(parse_hex_u64(&value, "block number").is_err());
    }

    #[test]
    fn empty_bytecode_is_not_contract() {
        assert!(!parse_has_code(&serde_json::json!("0x")).unwrap());
        assert!(!parse_has_code(&serde_json::json!("0x0")).unwrap());
        assert!(parse_has_code(&serde_json::json!("0x6080604052")).unwrap());
        assert!(parse_has_code(&serde_json::json!(null)).is_err());
    }

    #[test]
    fn verified_source_reports_contract_name() {
        let value = serde_json::json!([{
            "SourceCode": "pragma solidity ^0.8.0; contract Token {}",
            "ContractName": "Token",
            "ABI": "[]"
        }]);
        assert_eq!(
            parse_verification(value).unwrap(),
            ContractVerification::Verified {
                contract_name: Some("Token".to_owned())
            }
        );
    }

    #[test]
    fn unverified_source_placeholder() {
        let value = serde_json::json!([{
            "SourceCode": "",
            "ContractName": "",
            "ABI": "Contract source code not verified"
        }]);
        assert_eq!(parse_verification(value).unwrap(), ContractVerification::Unverified);
    }

    #[test]
    fn empty_source_list_is_inconclusive() {
        assert_eq!(
            parse_verification(serde_json::json!([])).unwrap(),
            ContractVerification::Inconclusive
        );
    }

    #[test]
    fn parse_tx_list_handles_contract_creation() {
        let value = serde_json::json!([
            {
                "hash": "0xabc",
                "from": "0x7a250d5630b4cf539739df2c5dacb4c659f2488d",
                "to": "",
                "blockNumber": "12345"
            }
        ]);
        let txs = parse_tx_list(value).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].block_number, 12_345);
        assert!(txs[0].to.is_none());
        assert_eq!(txs[0].hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn parse_tx_list_rejects_bad_block_number() {
        let value = serde_json::json!([
            {"from": "0x7a250d5630b4cf539739df2c5dacb4c659f2488d", "to": "", "blockNumber": "x"}
        ]);
        let err = parse_tx_list(value).expect_err("must reject");
        assert!(err.to_string().contains("invalid blockNumber"));
    }
}
