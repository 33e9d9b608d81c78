//! L2 RPC client implementation.

use std::time::Duration;

use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockId;
use async_trait::async_trait;
use url::Url;

use super::{
    HttpProvider, build_http_provider,
    error::{RpcError, RpcResult},
    traits::L2Client,
    types::AccountStorageProof,
};
use crate::constants::DEFAULT_RPC_TIMEOUT;

/// Configuration for the L2 client.
#[derive(Debug, Clone)]
pub struct L2ClientConfig {
    /// RPC endpoint URL.
    pub endpoint: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub skip_tls_verify: bool,
}

impl L2ClientConfig {
    /// Creates a new L2 client configuration with defaults.
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

/// L2 RPC client implementation using Alloy.
pub struct L2ClientImpl {
    /// The underlying HTTP provider.
    provider: HttpProvider,
}

impl std::fmt::Debug for L2ClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L2ClientImpl").finish_non_exhaustive()
    }
}

impl L2ClientImpl {
    /// Creates a new L2 client from the given configuration.
    pub fn new(config: L2ClientConfig) -> RpcResult<Self> {
        let provider =
            build_http_provider(config.endpoint, config.timeout, config.skip_tls_verify, "l2")?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl L2Client for L2ClientImpl {
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block_number: u64,
    ) -> RpcResult<AccountStorageProof> {
        let response = self
            .provider
            .get_proof(address, keys.clone())
            .block_id(BlockId::number(block_number))
            .await
            .map_err(RpcError::from)?;

        if response.storage_proof.len() != keys.len() {
            return Err(RpcError::InvalidResponse(format!(
                "requested {} storage proofs, got {}",
                keys.len(),
                response.storage_proof.len()
            )));
        }

        Ok(AccountStorageProof::from_response(&keys, response))
    }
}
