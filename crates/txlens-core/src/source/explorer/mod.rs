//! Etherscan-compatible explorer client.
//!
//! Implements [`ChainDataSource`](super::ChainDataSource) over the explorer's
//! `module`/`action` query API using `reqwest`, with optional request rate
//! limiting, API-key injection, and an LRU cache of first-activity blocks.

mod client;
mod connection;
mod parsing;
mod protocol;

pub use client::ExplorerClient;
