//! Built-in demo transactions.
//!
//! A fixed catalogue of synthetic wallet requests covering the common
//! transaction shapes, so the pipeline can be exercised without a wallet.
//! Decisions made on these are logged with `is_demo = true`.

use alloy::primitives::{hex, U256};
use serde::Serialize;

use crate::registry::selector_of;
use crate::types::RawTransactionRequest;

const DEMO_USER: &str = "0x742d35cc6634c0532925a3b844bc9e7595f08b6f";
const UNKNOWN_CONTRACT: &str = "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f";
const UNISWAP_V2_ROUTER: &str = "0x7a250d5630b4cf539739df2c5dacb4c659f2488d";
const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const DAI: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

/// Router deadline (unix seconds) used by the swap and liquidity demos.
const DEADLINE: u64 = 1_700_086_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoScenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub request: RawTransactionRequest,
}

fn address_word(address: &str) -> String {
    let raw = address.trim_start_matches("0x").to_ascii_lowercase();
    format!("{raw:0>64}")
}

fn uint_word(value: U256) -> String {
    format!("{:0>64}", format!("{value:x}"))
}

fn call(prototype: &str, words: &[String]) -> String {
    format!("0x{}{}", hex::encode(selector_of(prototype)), words.concat())
}

fn ether(whole: u64, tenths: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18))
        + U256::from(tenths) * U256::from(10u64).pow(U256::from(17))
}

fn quantity(value: U256) -> String {
    format!("0x{value:x}")
}

/// The demo catalogue, in display order.
pub fn demo_scenarios() -> Vec<DemoScenario> {
    let usdc_unit = U256::from(1_000_000u64);

    vec![
        DemoScenario {
            id: "safe-transfer",
            title: "Send ETH to a friend",
            description: "A plain 0.1 ETH transfer to a wallet address with no contract call.",
            request: RawTransactionRequest::new(DEMO_USER, quantity(ether(0, 1)), "0x"),
        },
        DemoScenario {
            id: "unlimited-approval",
            title: "Unlimited token approval",
            description: "Grants a DEX router permission to spend every USDC you hold.",
            request: RawTransactionRequest::new(
                USDC,
                "0x0",
                call(
                    "approve(address,uint256)",
                    &[address_word(UNISWAP_V2_ROUTER), uint_word(U256::MAX)],
                ),
            ),
        },
        DemoScenario {
            id: "dex-swap",
            title: "Swap ETH for USDC",
            description: "Swaps 1 ETH for at least 3,000 USDC through Uniswap V2.",
            request: RawTransactionRequest::new(
                UNISWAP_V2_ROUTER,
                quantity(ether(1, 0)),
                call(
                    "swapExactETHForTokens(uint256,address[],address,uint256)",
                    &[
                        uint_word(usdc_unit * U256::from(3_000u64)),
                        uint_word(U256::from(0x80u64)),
                        address_word(DEMO_USER),
                        uint_word(U256::from(DEADLINE)),
                        uint_word(U256::from(2u64)),
                        address_word(WETH),
                        address_word(USDC),
                    ],
                ),
            ),
        },
        DemoScenario {
            id: "unknown-contract",
            title: "Unknown contract call",
            description: "Sends 0.5 ETH along with a call to a function txlens does not recognize.",
            request: RawTransactionRequest::new(
                UNKNOWN_CONTRACT,
                quantity(ether(0, 5)),
                "0x12345678",
            ),
        },
        DemoScenario {
            id: "add-liquidity",
            title: "Provide DAI/ETH liquidity",
            description: "Deposits 2,000 DAI and 1 ETH into a Uniswap V2 pool.",
            request: RawTransactionRequest::new(
                UNISWAP_V2_ROUTER,
                quantity(ether(1, 0)),
                call(
                    "addLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
                    &[
                        address_word(DAI),
                        uint_word(ether(2_000, 0)),
                        uint_word(ether(1_990, 0)),
                        uint_word(ether(0, 9)),
                        address_word(DEMO_USER),
                        uint_word(U256::from(DEADLINE)),
                    ],
                ),
            ),
        },
    ]
}

/// Look up a scenario by id.
pub fn find_scenario(id: &str) -> Option<DemoScenario> {
    demo_scenarios().into_iter().find(|scenario| scenario.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::decode::Decoder;
    use crate::explain::explain;
    use crate::labels::lower_hex;
    use crate::registry::SignatureRegistry;
    use crate::types::{Confidence, TxKind};

    fn decode(id: &str) -> crate::types::DecodedTransaction {
        let registry = SignatureRegistry::standard();
        let scenario = find_scenario(id).expect("scenario exists");
        Decoder::new(&registry).decode(&scenario.request).unwrap()
    }

    #[test]
    fn ids_are_unique() {
        let scenarios = demo_scenarios();
        let ids: HashSet<_> = scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn every_scenario_decodes_to_expected_kind() {
        let expected = [
            ("safe-transfer", TxKind::Transfer),
            ("unlimited-approval", TxKind::Approval),
            ("dex-swap", TxKind::Swap),
            ("unknown-contract", TxKind::Unknown),
            ("add-liquidity", TxKind::Liquidity),
        ];
        for (id, kind) in expected {
            assert_eq!(decode(id).kind, kind, "{id}");
        }
    }

    #[test]
    fn structured_scenarios_decode_all_parameters() {
        for id in ["unlimited-approval", "dex-swap", "add-liquidity"] {
            assert!(decode(id).parameters.is_some(), "{id}");
        }
    }

    #[test]
    fn safe_transfer_reads_as_plain_send() {
        let intent = explain(&decode("safe-transfer"));
        assert_eq!(intent.intent, "Send 0.1 ETH to 0x742d...8b6f");
        assert_eq!(intent.confidence, Confidence::High);
    }

    #[test]
    fn swap_route_is_weth_to_usdc() {
        let decoded = decode("dex-swap");
        assert_eq!(
            decoded.token_address().map(|a| lower_hex(&a)).as_deref(),
            Some(USDC)
        );
        let intent = explain(&decoded);
        assert!(intent.intent.contains("Uniswap V2 Router"), "{}", intent.intent);
    }

    #[test]
    fn unknown_lookup_is_none() {
        assert!(find_scenario("does-not-exist").is_none());
    }
}
