//! Static labels for well-known mainnet contracts.
//!
//! Routers double as the exchange set for the trading-activity check, and
//! every labeled contract is treated as an audited protocol when a live
//! verification lookup cannot be completed.

use std::str::FromStr;

use alloy::primitives::{hex, Address};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Router,
    Token { symbol: &'static str, decimals: u8 },
    Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownAddress {
    pub address: &'static str,
    pub name: &'static str,
    pub kind: LabelKind,
}

const fn router(address: &'static str, name: &'static str) -> KnownAddress {
    KnownAddress {
        address,
        name,
        kind: LabelKind::Router,
    }
}

const fn token(
    address: &'static str,
    name: &'static str,
    symbol: &'static str,
    decimals: u8,
) -> KnownAddress {
    KnownAddress {
        address,
        name,
        kind: LabelKind::Token { symbol, decimals },
    }
}

const fn protocol(address: &'static str, name: &'static str) -> KnownAddress {
    KnownAddress {
        address,
        name,
        kind: LabelKind::Protocol,
    }
}

pub const KNOWN_ADDRESSES: &[KnownAddress] = &[
    router("0x7a250d5630b4cf539739df2c5dacb4c659f2488d", "Uniswap V2 Router"),
    router("0xe592427a0aece92de3edee1f18e0157c05861564", "Uniswap V3 Router"),
    router("0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45", "Uniswap V3 Router 2"),
    router("0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad", "Uniswap Universal Router"),
    router("0xd9e1ce17f2641f24ae83637ab66a2cca9c378b9f", "SushiSwap Router"),
    router("0x1111111254eeb25477b68fb85ed929f73a960582", "1inch Router"),
    router("0xdef1c0ded9bec7f1a1670819833240f027b25eff", "0x Exchange Proxy"),
    token("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "USD Coin", "USDC", 6),
    token("0xdac17f958d2ee523a2206206994597c13d831ec7", "Tether USD", "USDT", 6),
    token("0x6b175474e89094c44da98b954eedeac495271d0f", "Dai Stablecoin", "DAI", 18),
    token("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "Wrapped Ether", "WETH", 18),
    token("0x2260fac5e5542a773aa44fbcfedf7c193bc2c599", "Wrapped BTC", "WBTC", 8),
    token("0x514910771af9ca656af840dff83e8264ecf986ca", "Chainlink", "LINK", 18),
    token("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984", "Uniswap", "UNI", 18),
    protocol("0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2", "Aave V3 Pool"),
    protocol("0xc3d688b66703497daa19211eedff47f25384cdc3", "Compound V3 USDC"),
    protocol("0xae7ab96520de3a18e5e111b5eaab095312d7fe84", "Lido stETH"),
];

impl KnownAddress {
    pub fn parsed(&self) -> Option<Address> {
        Address::from_str(self.address).ok()
    }

    pub fn is_router(&self) -> bool {
        matches!(self.kind, LabelKind::Router)
    }
}

pub fn lookup(address: &Address) -> Option<&'static KnownAddress> {
    let lower = lower_hex(address);
    KNOWN_ADDRESSES.iter().find(|known| known.address == lower)
}

/// Name of the exchange router at `address`, if it is one.
pub fn router_name(address: &Address) -> Option<&'static str> {
    lookup(address)
        .filter(|known| known.is_router())
        .map(|known| known.name)
}

pub fn routers() -> impl Iterator<Item = &'static KnownAddress> {
    KNOWN_ADDRESSES.iter().filter(|known| known.is_router())
}

/// `(symbol, decimals)` for a known token contract.
pub fn token_info(address: &Address) -> Option<(&'static str, u8)> {
    match lookup(address)?.kind {
        LabelKind::Token { symbol, decimals } => Some((symbol, decimals)),
        _ => None,
    }
}

/// Lowercase `0x`-prefixed hex form.
pub fn lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// `0x1234...abcd`: first six and last four characters of the hex form.
pub fn short_address(address: &Address) -> String {
    let full = lower_hex(address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Human label for an address: its known name, else its short form.
pub fn display_name(address: &Address) -> String {
    lookup(address).map_or_else(|| short_address(address), |known| known.name.to_owned())
}
