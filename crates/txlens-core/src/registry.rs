//! Read-only table of known function signatures.
//!
//! Each registered prototype is parsed once into a static decode plan made
//! of a closed set of parameter kinds. The decoder only ever walks these
//! plans, so adding a function is a matter of adding its prototype string.

use std::collections::HashMap;

use alloy::primitives::{hex, keccak256};

use crate::error::CoreError;

/// ERC-20 and Uniswap-V2-style router functions understood out of the box.
pub const STANDARD_PROTOTYPES: &[&str] = &[
    "transfer(address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)",
    "swapTokensForExactTokens(uint256,uint256,address[],address,uint256)",
    "swapExactETHForTokens(uint256,address[],address,uint256)",
    "swapETHForExactTokens(uint256,address[],address,uint256)",
    "swapExactTokensForETH(uint256,uint256,address[],address,uint256)",
    "swapTokensForExactETH(uint256,uint256,address[],address,uint256)",
    "addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)",
    "addLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
    "removeLiquidity(address,address,uint256,uint256,uint256,address,uint256)",
    "removeLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
];

/// A 4-byte function selector.
pub type Selector = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Address,
    Uint,
    AddressArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub selector: Selector,
    /// Canonical prototype, e.g. `approve(address,uint256)`.
    pub prototype: String,
    pub plan: Vec<ParamKind>,
}

impl FunctionSignature {
    pub fn parse(prototype: &str) -> Result<Self, CoreError> {
        let invalid = |message: &str| CoreError::InvalidSignature {
            signature: prototype.to_owned(),
            message: message.to_owned(),
        };

        let (name, rest) = prototype
            .split_once('(')
            .ok_or_else(|| invalid("missing `(`"))?;
        let args = rest
            .strip_suffix(')')
            .ok_or_else(|| invalid("missing closing `)`"))?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("function name must be a plain identifier"));
        }

        let plan = if args.is_empty() {
            Vec::new()
        } else {
            args.split(',')
                .map(|ty| {
                    parse_param_kind(ty)
                        .ok_or_else(|| invalid(&format!("unsupported parameter type `{ty}`")))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            selector: selector_of(prototype),
            prototype: prototype.to_owned(),
            plan,
        })
    }

    pub fn selector_hex(&self) -> String {
        hex::encode(self.selector)
    }
}

fn parse_param_kind(ty: &str) -> Option<ParamKind> {
    match ty {
        "address" => Some(ParamKind::Address),
        "address[]" => Some(ParamKind::AddressArray),
        "uint" => Some(ParamKind::Uint),
        _ => {
            let bits: u16 = ty.strip_prefix("uint")?.parse().ok()?;
            (bits > 0 && bits <= 256 && bits % 8 == 0).then_some(ParamKind::Uint)
        }
    }
}

/// First four bytes of the keccak-256 hash of a canonical prototype.
pub fn selector_of(prototype: &str) -> Selector {
    let hash = keccak256(prototype.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    by_selector: HashMap<Selector, FunctionSignature>,
}

impl SignatureRegistry {
    /// Build a registry from prototype strings. Rejects unsupported parameter
    /// types and selector collisions.
    pub fn from_prototypes<I, S>(prototypes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_selector: HashMap<Selector, FunctionSignature> = HashMap::new();
        for prototype in prototypes {
            let sig = FunctionSignature::parse(prototype.as_ref())?;
            if let Some(existing) = by_selector.get(&sig.selector) {
                return Err(CoreError::InvalidSignature {
                    signature: sig.prototype.clone(),
                    message: format!("selector collides with `{}`", existing.prototype),
                });
            }
            by_selector.insert(sig.selector, sig);
        }
        Ok(Self { by_selector })
    }

    /// The built-in token and router signatures.
    pub fn standard() -> Self {
        Self::from_prototypes(STANDARD_PROTOTYPES)
            .expect("built-in prototypes are well-formed and collision-free")
    }

    pub fn lookup(&self, selector: &Selector) -> Option<&FunctionSignature> {
        self.by_selector.get(selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.by_selector.values()
    }

    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }
}
