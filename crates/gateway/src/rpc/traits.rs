//! Async trait definitions for RPC clients.

use alloy_primitives::{Address, B256, Bytes};
use alloy_rpc_types_eth::{Filter, Log};
use async_trait::async_trait;

use super::{error::RpcResult, types::AccountStorageProof};

/// L1 RPC client trait for reading the commitment chain and resolver stubs.
#[async_trait]
pub trait L1Client: Send + Sync {
    /// Gets the latest block number.
    async fn block_number(&self) -> RpcResult<u64>;

    /// Returns the logs matching `filter` (`eth_getLogs`).
    async fn get_logs(&self, filter: &Filter) -> RpcResult<Vec<Log>>;

    /// Returns the input data of the transaction with the given hash.
    async fn transaction_input(&self, hash: B256) -> RpcResult<Bytes>;

    /// Executes a contract call without creating a transaction.
    /// If `block_number` is `None`, uses the latest block.
    async fn call_contract(
        &self,
        to: Address,
        data: Bytes,
        block_number: Option<u64>,
    ) -> RpcResult<Bytes>;
}

/// L2 RPC client trait for fetching state proofs.
#[async_trait]
pub trait L2Client: Send + Sync {
    /// Gets an account and storage proof via `eth_getProof` at `block_number`.
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block_number: u64,
    ) -> RpcResult<AccountStorageProof>;
}
