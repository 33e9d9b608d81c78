//! L1 RPC client implementation.

use std::time::Duration;

use alloy_consensus::Transaction as _;
use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, B256, Bytes};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockId, Filter, Log, TransactionInput, TransactionRequest};
use async_trait::async_trait;
use url::Url;

use super::{
    HttpProvider, build_http_provider,
    error::{RpcError, RpcResult},
    traits::L1Client,
};
use crate::constants::DEFAULT_RPC_TIMEOUT;

/// Configuration for the L1 client.
#[derive(Debug, Clone)]
pub struct L1ClientConfig {
    /// RPC endpoint URL.
    pub endpoint: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub skip_tls_verify: bool,
}

impl L1ClientConfig {
    /// Creates a new L1 client configuration with defaults.
    pub const fn new(endpoint: Url) -> Self {
        Self { endpoint, timeout: DEFAULT_RPC_TIMEOUT, skip_tls_verify: false }
    }

    /// Sets the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets whether to skip TLS certificate verification.
    pub const fn with_skip_tls_verify(mut self, skip: bool) -> Self {
        self.skip_tls_verify = skip;
        self
    }
}

/// L1 RPC client implementation using Alloy.
pub struct L1ClientImpl {
    /// The underlying HTTP provider.
    provider: HttpProvider,
}

impl std::fmt::Debug for L1ClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L1ClientImpl").finish_non_exhaustive()
    }
}

impl L1ClientImpl {
    /// Creates a new L1 client from the given configuration.
    pub fn new(config: L1ClientConfig) -> RpcResult<Self> {
        let provider =
            build_http_provider(config.endpoint, config.timeout, config.skip_tls_verify, "l1")?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl L1Client for L1ClientImpl {
    async fn block_number(&self) -> RpcResult<u64> {
        self.provider.get_block_number().await.map_err(RpcError::from)
    }

    async fn get_logs(&self, filter: &Filter) -> RpcResult<Vec<Log>> {
        self.provider.get_logs(filter).await.map_err(RpcError::from)
    }

    async fn transaction_input(&self, hash: B256) -> RpcResult<Bytes> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(RpcError::from)?
            .ok_or_else(|| RpcError::TransactionNotFound(hash.to_string()))?;

        Ok(tx.input().clone())
    }

    async fn call_contract(
        &self,
        to: Address,
        data: Bytes,
        block_number: Option<u64>,
    ) -> RpcResult<Bytes> {
        let block_id = BlockId::Number(
            block_number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number),
        );

        let req = TransactionRequest::default().to(to).input(TransactionInput::new(data));
        self.provider.call(req).block(block_id).await.map_err(RpcError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l1_client_config_defaults() {
        let config = L1ClientConfig::new(Url::parse("http://localhost:8545").unwrap());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.skip_tls_verify);
    }

    #[test]
    fn test_l1_client_config_builder() {
        let config = L1ClientConfig::new(Url::parse("http://localhost:8545").unwrap())
            .with_timeout(Duration::from_secs(5))
            .with_skip_tls_verify(true);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.skip_tls_verify);
    }

    #[test]
    fn test_l1_client_new() {
        let config = L1ClientConfig::new(Url::parse("http://localhost:8545").unwrap());
        assert!(L1ClientImpl::new(config).is_ok());
    }
}
