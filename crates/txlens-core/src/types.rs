//! Domain types for txlens' transaction understanding pipeline.
//!
//! Contains the raw wallet request (`RawTransactionRequest`), the decoder's
//! output (`DecodedTransaction`, `ParamValue`), the explainer's output
//! (`IntentAnalysis`), risk indicators, and the assembled
//! `TransactionContext` handed to the decision layer.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Raw Wallet Request
// ==============================================================================

/// A pending transaction exactly as a dapp hands it to the wallet.
///
/// Hex strings are kept verbatim; normalization happens in the decoder so a
/// malformed `data` payload never prevents the request from being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_value")]
    pub value: String,
    #[serde(default = "default_data")]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

fn default_value() -> String {
    "0x0".to_owned()
}

fn default_data() -> String {
    "0x".to_owned()
}

impl RawTransactionRequest {
    pub fn new(to: impl Into<String>, value: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            value: value.into(),
            data: data.into(),
            from: None,
            gas: None,
            gas_price: None,
        }
    }
}

impl Default for RawTransactionRequest {
    fn default() -> Self {
        Self::new(String::new(), default_value(), default_data())
    }
}

// ==============================================================================
// Decoded Transaction
// ==============================================================================

/// Coarse classification derived from the called function's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Transfer,
    Swap,
    Approval,
    Liquidity,
    Unknown,
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transfer => write!(f, "transfer"),
            Self::Swap => write!(f, "swap"),
            Self::Approval => write!(f, "approval"),
            Self::Liquidity => write!(f, "liquidity"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One decoded call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Address(Address),
    Uint(#[serde(with = "u256_decimal")] U256),
    AddressArray(Vec<Address>),
}

impl ParamValue {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address_array(&self) -> Option<&[Address]> {
        match self {
            Self::AddressArray(path) => Some(path),
            _ => None,
        }
    }
}

/// Decoder output. `parameters` is only populated when the selector was
/// registered and the payload decoded cleanly against its plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransaction {
    pub to: Address,
    /// Native value in wei.
    #[serde(with = "u256_decimal")]
    pub value: U256,
    /// Lowercased, `0x`-prefixed call data as supplied.
    pub data: String,
    pub kind: TxKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParamValue>>,
}

impl DecodedTransaction {
    /// The function name without its argument list, e.g. `approve`.
    pub fn function_base_name(&self) -> Option<&str> {
        self.function_name
            .as_deref()
            .map(|name| name.split_once('(').map_or(name, |(base, _)| base))
    }

    /// The token contract this transaction moves or grants access to.
    ///
    /// Swaps report the output token (last path element) and liquidity calls
    /// the first pool token (`token` or `tokenA`). Token transfers and
    /// approvals report the called contract. Native transfers, unknown calls
    /// and liquidity calls without decoded arguments have no token.
    pub fn token_address(&self) -> Option<Address> {
        match self.kind {
            TxKind::Swap => self
                .parameters
                .as_deref()?
                .iter()
                .find_map(ParamValue::as_address_array)
                .and_then(|path| path.last().copied()),
            TxKind::Liquidity => self
                .parameters
                .as_deref()?
                .iter()
                .find_map(ParamValue::as_address),
            TxKind::Transfer if self.function_name.is_none() => None,
            TxKind::Transfer | TxKind::Approval => Some(self.to),
            TxKind::Unknown => None,
        }
    }
}

// ==============================================================================
// Intent Analysis
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Plain-language explanation of what a transaction will do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentAnalysis {
    pub intent: String,
    pub estimated_outcome: String,
    pub confidence: Confidence,
    pub details: Vec<String>,
}

// ==============================================================================
// Risk Indicators
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorType {
    NewToken,
    UnverifiedContract,
    NoDexPool,
    HighValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// A single observed signal. Messages describe what was observed and never
/// claim that a transaction is safe or malicious.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskIndicator {
    #[serde(rename = "type")]
    pub kind: IndicatorType,
    pub severity: Severity,
    pub message: String,
    pub source: String,
}

impl RiskIndicator {
    pub fn info(kind: IndicatorType, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn warning(
        kind: IndicatorType,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

// ==============================================================================
// Transaction Context
// ==============================================================================

/// The assembled review artifact for one pending transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionContext {
    pub hash: String,
    pub kind: TxKind,
    pub recipient: Address,
    /// Native value in wei, as a decimal string.
    pub value: String,
    pub intent: String,
    pub estimated_outcome: String,
    pub confidence: Confidence,
    pub details: Vec<String>,
    pub risk_indicators: Vec<RiskIndicator>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl TransactionContext {
    pub fn warning_count(&self) -> usize {
        self.risk_indicators.iter().filter(|i| i.is_warning()).count()
    }
}

/// Serializes `U256` as a base-10 string instead of alloy's hex form.
pub(crate) mod u256_decimal {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<U256>().map_err(serde::de::Error::custom)
    }
}
