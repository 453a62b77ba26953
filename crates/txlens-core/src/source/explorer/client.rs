use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::{CoreError, SourceError};
use crate::labels::lower_hex;
use crate::source::types::{ContractVerification, TxHistoryQuery, TxSummary};
use crate::source::ChainDataSource;

use super::connection::parse_base_url;
use super::parsing::{parse_has_code, parse_hex_u64, parse_tx_list, parse_verification};
use super::protocol::ExplorerResponse;

/// Maximum number of address → first-activity-block entries cached.
const FIRST_BLOCK_CACHE_CAP: usize = 10_000;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Etherscan-compatible explorer client over HTTP(S).
///
/// First-activity blocks are cached in a bounded LRU: once an address has
/// history its earliest transaction never changes, so entries only need
/// eviction, never invalidation.
pub struct ExplorerClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    name: String,
    limiter: Option<DirectRateLimiter>,
    first_block_cache: RwLock<LruCache<Address, u64>>,
}

impl ExplorerClient {
    /// Create a client for an explorer API base URL such as
    /// `https://api.etherscan.io/api`.
    ///
    /// If `requests_per_second` is set, every outbound request waits for the
    /// limiter first.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        requests_per_second: Option<u32>,
    ) -> Result<Self, CoreError> {
        let (base_url, name) = parse_base_url(base_url)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(15))
            .pool_max_idle_per_host(16)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        let limiter = match requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::InvalidInput("requests_per_second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_owned),
            name,
            limiter,
            first_block_cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(FIRST_BLOCK_CACHE_CAP)
                    .expect("FIRST_BLOCK_CACHE_CAP is non-zero"),
            )),
        })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    async fn call(
        &self,
        module: &str,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, SourceError> {
        self.wait_for_rate_limit().await;
        debug!(
            explorer.module = module,
            explorer.action = action,
            explorer.params = params.len(),
            "explorer call"
        );

        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 3);
        query.push(("module", module.to_owned()));
        query.push(("action", action.to_owned()));
        query.extend(params.iter().cloned());
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(
            explorer.action = action,
            %status,
            body_len = body.len(),
            "explorer response"
        );
        trace!(explorer.action = action, body = %body, "explorer response body");

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let decoded: ExplorerResponse = serde_json::from_str(&body).map_err(|e| {
            SourceError::InvalidResponse(format!("decode explorer response: {e}; body={body}"))
        })?;
        decoded.into_result()
    }
}

#[async_trait]
impl ChainDataSource for ExplorerClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn has_code(&self, address: &Address) -> Result<bool, SourceError> {
        let raw = self
            .call(
                "proxy",
                "eth_getCode",
                &[("address", lower_hex(address)), ("tag", "latest".to_owned())],
            )
            .await?;
        parse_has_code(&raw)
    }

    async fn contract_verification(
        &self,
        address: &Address,
    ) -> Result<ContractVerification, SourceError> {
        let raw = self
            .call("contract", "getsourcecode", &[("address", lower_hex(address))])
            .await?;
        parse_verification(raw)
    }

    async fn block_number(&self) -> Result<u64, SourceError> {
        let raw = self.call("proxy", "eth_blockNumber", &[]).await?;
        parse_hex_u64(&raw, "block number")
    }

    async fn address_transactions(
        &self,
        address: &Address,
        query: &TxHistoryQuery,
    ) -> Result<Vec<TxSummary>, SourceError> {
        let mut params = vec![
            ("address", lower_hex(address)),
            ("startblock", query.start_block.to_string()),
            ("page", query.page.to_string()),
            ("offset", query.page_size.to_string()),
            ("sort", query.sort.as_str().to_owned()),
        ];
        if let Some(end) = query.end_block {
            params.push(("endblock", end.to_string()));
        }
        let raw = self.call("account", "txlist", &params).await?;
        parse_tx_list(raw)
    }

    async fn first_transaction_block(&self, address: &Address) -> Result<Option<u64>, SourceError> {
        // `LruCache::get` updates recency, so even reads take the write lock.
        if let Some(block) = self.first_block_cache.write().await.get(address).copied() {
            return Ok(Some(block));
        }

        let txs = self
            .address_transactions(address, &TxHistoryQuery::earliest())
            .await?;
        let first = txs.iter().map(|tx| tx.block_number).min();
        if let Some(block) = first {
            self.first_block_cache.write().await.put(*address, block);
        }
        Ok(first)
    }
}
