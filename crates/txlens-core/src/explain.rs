//! Plain-language intent explanation for decoded transactions.
//!
//! `explain` is pure and total: every decoded transaction yields an
//! intent sentence. Handlers return `None` when the parameters they need
//! are missing, which routes the transaction to the low-confidence
//! fallback. Sentences name contracts by label or shortened address and
//! never embed raw call data.

use alloy::primitives::{Address, U256};

use crate::labels::{display_name, router_name, short_address, token_info};
use crate::types::{Confidence, DecodedTransaction, IntentAnalysis, ParamValue, TxKind};
use crate::units::{format_amount, format_ether, ETHER_DECIMALS};

const UNKNOWN_DEX: &str = "Unknown DEX";

pub const UNLIMITED_APPROVAL_WARNING: &str =
    "WARNING: This approval grants unlimited access to this token. Only approve contracts you trust.";

const REVOKE_NOTE: &str = "You can revoke this approval later by approving an amount of zero";

const IRREVERSIBLE_NOTE: &str = "Transfers cannot be reversed once confirmed";

const UNKNOWN_CAUTION: &str =
    "Caution: this call could not be fully decoded. Only continue if you trust this contract.";

#[must_use]
pub fn explain(decoded: &DecodedTransaction) -> IntentAnalysis {
    let handled = match decoded.kind {
        TxKind::Transfer => explain_transfer(decoded),
        TxKind::Swap => explain_swap(decoded),
        TxKind::Approval => explain_approval(decoded),
        TxKind::Liquidity => explain_liquidity(decoded),
        TxKind::Unknown => None,
    };
    handled.unwrap_or_else(|| explain_unknown(decoded))
}

// ==============================================================================
// Token Helpers
// ==============================================================================

/// Display symbol and decimals for a token contract. Unknown tokens are
/// assumed to use 18 decimals.
fn token_display(address: &Address) -> (String, u8) {
    match token_info(address) {
        Some((symbol, decimals)) => (symbol.to_owned(), decimals),
        None => (format!("tokens ({})", short_address(address)), ETHER_DECIMALS),
    }
}

fn token_symbol(address: &Address) -> String {
    token_info(address).map_or_else(|| short_address(address), |(symbol, _)| symbol.to_owned())
}

fn token_amount(amount: U256, token: &Address) -> String {
    let (symbol, decimals) = token_display(token);
    format!("{} {symbol}", format_amount(amount, decimals))
}

fn params(decoded: &DecodedTransaction) -> &[ParamValue] {
    decoded.parameters.as_deref().unwrap_or_default()
}

fn address_at(params: &[ParamValue], index: usize) -> Option<Address> {
    params.get(index)?.as_address()
}

fn uint_at(params: &[ParamValue], index: usize) -> Option<U256> {
    params.get(index)?.as_uint()
}

fn path_at(params: &[ParamValue], index: usize) -> Option<&[Address]> {
    params.get(index)?.as_address_array()
}

fn analysis(
    intent: String,
    estimated_outcome: String,
    confidence: Confidence,
    details: Vec<String>,
) -> IntentAnalysis {
    IntentAnalysis {
        intent,
        estimated_outcome,
        confidence,
        details,
    }
}

// ==============================================================================
// Transfers
// ==============================================================================

fn explain_transfer(decoded: &DecodedTransaction) -> Option<IntentAnalysis> {
    let Some(function) = decoded.function_name.as_deref() else {
        let eth = format_ether(decoded.value);
        let recipient = short_address(&decoded.to);
        return Some(analysis(
            format!("Send {eth} ETH to {recipient}"),
            format!("Your balance decreases by {eth} ETH plus network fees, and {recipient} receives it."),
            Confidence::High,
            vec![
                format!("Recipient: {}", display_name(&decoded.to)),
                format!("Amount: {eth} ETH"),
                IRREVERSIBLE_NOTE.to_owned(),
            ],
        ));
    };

    let params = params(decoded);
    match function {
        "transfer(address,uint256)" => {
            let recipient = address_at(params, 0)?;
            let amount = token_amount(uint_at(params, 1)?, &decoded.to);
            Some(analysis(
                format!("Send {amount} to {}", short_address(&recipient)),
                format!("{amount} will move from your wallet to {}.", short_address(&recipient)),
                Confidence::High,
                vec![
                    format!("Token contract: {}", display_name(&decoded.to)),
                    format!("Recipient: {}", display_name(&recipient)),
                    IRREVERSIBLE_NOTE.to_owned(),
                ],
            ))
        }
        "transferFrom(address,address,uint256)" => {
            let from = address_at(params, 0)?;
            let to = address_at(params, 1)?;
            let amount = token_amount(uint_at(params, 2)?, &decoded.to);
            Some(analysis(
                format!(
                    "Move {amount} from {} to {}",
                    short_address(&from),
                    short_address(&to)
                ),
                format!("{amount} will be pulled from {} using an earlier approval.", short_address(&from)),
                Confidence::Medium,
                vec![
                    format!("Token contract: {}", display_name(&decoded.to)),
                    format!("From: {}", display_name(&from)),
                    format!("To: {}", display_name(&to)),
                    "This is a delegated transfer and only succeeds if the owner approved it beforehand"
                        .to_owned(),
                ],
            ))
        }
        _ => None,
    }
}

// ==============================================================================
// Swaps
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwapShape {
    ExactEthForTokens,
    ExactTokensForEth,
    ExactTokensForTokens,
}

impl SwapShape {
    fn classify(name: &str) -> Option<Self> {
        if name.contains("swapExactETHForTokens") {
            Some(Self::ExactEthForTokens)
        } else if name.contains("swapExactTokensForETH") {
            Some(Self::ExactTokensForEth)
        } else if name.starts_with("swapExact") && name.ends_with("ForTokens") {
            Some(Self::ExactTokensForTokens)
        } else {
            None
        }
    }
}

fn explain_swap(decoded: &DecodedTransaction) -> Option<IntentAnalysis> {
    let dex = router_name(&decoded.to).unwrap_or(UNKNOWN_DEX);
    let name = decoded.function_base_name()?;
    if let Some(shape) = SwapShape::classify(name) {
        return explain_exact_swap(decoded, shape, dex);
    }

    let mut details = vec![format!("Exchange: {dex}"), format!("Function: {name}")];
    if !decoded.value.is_zero() {
        details.push(format!("ETH sent with swap: {}", format_ether(decoded.value)));
    }
    Some(analysis(
        format!("Perform token swap on {dex}"),
        "Tokens will be exchanged at the current market price.".to_owned(),
        Confidence::Medium,
        details,
    ))
}

fn explain_exact_swap(
    decoded: &DecodedTransaction,
    shape: SwapShape,
    dex: &str,
) -> Option<IntentAnalysis> {
    let params = params(decoded);
    let (input, output, route) = match shape {
        SwapShape::ExactEthForTokens => {
            let min_out = uint_at(params, 0)?;
            let path = path_at(params, 1)?;
            (
                format!("{} ETH", format_ether(decoded.value)),
                token_amount(min_out, path.last()?),
                path,
            )
        }
        SwapShape::ExactTokensForEth => {
            let amount_in = uint_at(params, 0)?;
            let min_out = uint_at(params, 1)?;
            let path = path_at(params, 2)?;
            (
                token_amount(amount_in, path.first()?),
                format!("{} ETH", format_ether(min_out)),
                path,
            )
        }
        SwapShape::ExactTokensForTokens => {
            let amount_in = uint_at(params, 0)?;
            let min_out = uint_at(params, 1)?;
            let path = path_at(params, 2)?;
            (
                token_amount(amount_in, path.first()?),
                token_amount(min_out, path.last()?),
                path,
            )
        }
    };

    let route = route.iter().map(token_symbol).collect::<Vec<_>>().join(" → ");
    Some(analysis(
        format!("Swap {input} for at least {output} on {dex}"),
        format!("You give {input} and receive at least {output}; the final amount depends on the price when the swap executes."),
        Confidence::High,
        vec![
            format!("Exchange: {dex}"),
            format!("Route: {route}"),
            format!("Minimum received: {output}"),
            "Price movement before confirmation can change the amount you receive".to_owned(),
        ],
    ))
}

// ==============================================================================
// Approvals
// ==============================================================================

fn explain_approval(decoded: &DecodedTransaction) -> Option<IntentAnalysis> {
    let params = params(decoded);
    if params.len() < 2 {
        return None;
    }
    let spender = address_at(params, 0)?;
    let amount = uint_at(params, 1)?;
    let unlimited = amount == U256::MAX;

    let (symbol, _) = token_display(&decoded.to);
    let spender_name = display_name(&spender);
    let allowance = if unlimited {
        format!("an unlimited amount of your {symbol}")
    } else {
        format!("up to {}", token_amount(amount, &decoded.to))
    };

    let mut details = vec![
        format!("Spender: {spender_name}"),
        format!("Token contract: {}", display_name(&decoded.to)),
    ];
    if unlimited {
        details.push(UNLIMITED_APPROVAL_WARNING.to_owned());
    }
    details.push(REVOKE_NOTE.to_owned());

    Some(analysis(
        format!("Allow {spender_name} to spend {allowance}"),
        format!("{spender_name} will be able to move {allowance} without asking you again."),
        Confidence::High,
        details,
    ))
}

// ==============================================================================
// Liquidity
// ==============================================================================

fn explain_liquidity(decoded: &DecodedTransaction) -> Option<IntentAnalysis> {
    let name = decoded.function_base_name()?;
    let params = params(decoded);
    let dex = router_name(&decoded.to).unwrap_or(UNKNOWN_DEX);
    let eth_paired = name.contains("ETH");

    if name.contains("addLiquidity") {
        let (first, second, pair) = if eth_paired {
            let token = address_at(params, 0)?;
            let amount = token_amount(uint_at(params, 1)?, &token);
            let eth = format!("{} ETH", format_ether(decoded.value));
            (amount, eth, format!("{}/ETH", token_symbol(&token)))
        } else {
            let token_a = address_at(params, 0)?;
            let token_b = address_at(params, 1)?;
            (
                token_amount(uint_at(params, 2)?, &token_a),
                token_amount(uint_at(params, 3)?, &token_b),
                format!("{}/{}", token_symbol(&token_a), token_symbol(&token_b)),
            )
        };
        return Some(analysis(
            format!("Add {first} and {second} to the {pair} liquidity pool on {dex}"),
            "You will receive LP tokens representing your share of the pool and earn a portion of its trading fees.".to_owned(),
            Confidence::High,
            vec![
                format!("Exchange: {dex}"),
                format!("Pool: {pair}"),
                "Deposited amounts may be adjusted to match the current pool ratio".to_owned(),
                "Pool value can change with token prices while you provide liquidity".to_owned(),
            ],
        ));
    }

    if name.contains("removeLiquidity") {
        let pair = if eth_paired {
            format!("{}/ETH", token_symbol(&address_at(params, 0)?))
        } else {
            format!(
                "{}/{}",
                token_symbol(&address_at(params, 0)?),
                token_symbol(&address_at(params, 1)?)
            )
        };
        let liquidity_index = if eth_paired { 1 } else { 2 };
        let lp_amount = format_amount(uint_at(params, liquidity_index)?, ETHER_DECIMALS);
        return Some(analysis(
            format!("Withdraw liquidity from the {pair} pool on {dex}"),
            "Your LP tokens will be burned and you will receive your share of both pool tokens, including accrued fees.".to_owned(),
            Confidence::High,
            vec![
                format!("Exchange: {dex}"),
                format!("Pool: {pair}"),
                format!("LP tokens burned: {lp_amount}"),
            ],
        ));
    }

    None
}

// ==============================================================================
// Fallback
// ==============================================================================

fn explain_unknown(decoded: &DecodedTransaction) -> IntentAnalysis {
    let label = display_name(&decoded.to);
    let mut details = vec![format!("Contract: {label}")];
    if let Some(name) = decoded.function_base_name() {
        details.push(format!("Function: {name}"));
    } else if decoded.selector.is_some() {
        details.push("Function: not recognized".to_owned());
    }
    details.push(UNKNOWN_CAUTION.to_owned());

    if decoded.value.is_zero() {
        return analysis(
            "Unknown transaction type".to_owned(),
            "The effect of this transaction could not be determined.".to_owned(),
            Confidence::Low,
            details,
        );
    }

    let eth = format_ether(decoded.value);
    analysis(
        format!("Send {eth} ETH to {label}"),
        format!("{eth} ETH will leave your wallet, and the contract may take further actions that could not be decoded."),
        Confidence::Low,
        details,
    )
}
