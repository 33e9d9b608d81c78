//! In-memory chain clients for unit tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;

use crate::{
    batch::StateBatchHeader,
    contracts::IStateCommitmentChain,
    rpc::{AccountStorageProof, L1Client, L2Client, RpcError, RpcResult},
};

/// Mock L1 client serving a fixed head, a fixed set of logs and canned call output.
#[derive(Debug, Default)]
pub(crate) struct MockL1 {
    head: u64,
    logs: Vec<Log>,
    tx_inputs: HashMap<B256, Bytes>,
    call_output: Bytes,
    fail_get_logs: bool,
    queried_ranges: Mutex<Vec<(u64, u64)>>,
    calls: AtomicUsize,
}

impl MockL1 {
    pub(crate) fn with_head(mut self, head: u64) -> Self {
        self.head = head;
        self
    }

    pub(crate) fn with_call_output(mut self, output: Bytes) -> Self {
        self.call_output = output;
        self
    }

    pub(crate) fn with_failing_get_logs(mut self) -> Self {
        self.fail_get_logs = true;
        self
    }

    /// Adds a `StateBatchAppended` log for `header` at `block` and registers
    /// the matching `appendStateBatch` transaction input.
    pub(crate) fn with_batch(
        mut self,
        chain: Address,
        header: &StateBatchHeader,
        roots: Vec<B256>,
        block: u64,
        log_index: u64,
    ) -> Self {
        let tx_hash = B256::from(U256::from(block) << 64 | U256::from(log_index));
        let event = IStateCommitmentChain::StateBatchAppended {
            _batchIndex: header.batch_index,
            _batchRoot: header.batch_root,
            _batchSize: header.batch_size,
            _prevTotalElements: header.prev_total_elements,
            _extraData: header.extra_data.clone(),
        };
        self.logs.push(Log {
            inner: alloy_primitives::Log { address: chain, data: event.encode_log_data() },
            block_hash: None,
            block_number: Some(block),
            block_timestamp: None,
            transaction_hash: Some(tx_hash),
            transaction_index: None,
            log_index: Some(log_index),
            removed: false,
        });

        let input = IStateCommitmentChain::appendStateBatchCall {
            _batch: roots,
            _shouldStartAtElement: header.prev_total_elements,
        }
        .abi_encode();
        self.tx_inputs.insert(tx_hash, Bytes::from(input));
        self
    }

    /// Overrides the transaction input of every registered batch.
    pub(crate) fn with_tx_input_override(mut self, input: Bytes) -> Self {
        for value in self.tx_inputs.values_mut() {
            *value = input.clone();
        }
        self
    }

    /// Block ranges passed to `get_logs`, in call order.
    pub(crate) fn queried_ranges(&self) -> Vec<(u64, u64)> {
        self.queried_ranges.lock().unwrap().clone()
    }

    /// Total number of RPC calls served.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl L1Client for MockL1 {
    async fn block_number(&self) -> RpcResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.head)
    }

    async fn get_logs(&self, filter: &Filter) -> RpcResult<Vec<Log>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_logs {
            return Err(RpcError::Transport("connection reset".into()));
        }

        let from = filter.get_from_block().unwrap_or_default();
        let to = filter.get_to_block().unwrap_or(u64::MAX);
        self.queried_ranges.lock().unwrap().push((from, to));

        Ok(self
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|b| (from..=to).contains(&b)))
            .cloned()
            .collect())
    }

    async fn transaction_input(&self, hash: B256) -> RpcResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tx_inputs
            .get(&hash)
            .cloned()
            .ok_or_else(|| RpcError::TransactionNotFound(hash.to_string()))
    }

    async fn call_contract(
        &self,
        _to: Address,
        _data: Bytes,
        _block_number: Option<u64>,
    ) -> RpcResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.call_output.clone())
    }
}

/// Mock L2 client returning a canned proof and recording what was requested.
#[derive(Debug, Default)]
pub(crate) struct MockL2 {
    proof: Option<AccountStorageProof>,
    requests: Mutex<Vec<(Address, Vec<B256>, u64)>>,
}

impl MockL2 {
    pub(crate) fn with_proof(mut self, proof: AccountStorageProof) -> Self {
        self.proof = Some(proof);
        self
    }

    pub(crate) fn requests(&self) -> Vec<(Address, Vec<B256>, u64)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl L2Client for MockL2 {
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block_number: u64,
    ) -> RpcResult<AccountStorageProof> {
        self.requests.lock().unwrap().push((address, keys, block_number));
        self.proof
            .clone()
            .ok_or_else(|| RpcError::ProofNotFound(format!("block {block_number} pruned")))
    }
}

/// Header for a batch of `size` roots following `prev_total_elements` earlier roots.
pub(crate) fn header(batch_index: u64, size: u64, prev_total_elements: u64) -> StateBatchHeader {
    StateBatchHeader {
        batch_index: U256::from(batch_index),
        batch_root: B256::repeat_byte(batch_index as u8),
        batch_size: U256::from(size),
        prev_total_elements: U256::from(prev_total_elements),
        extra_data: Bytes::new(),
    }
}

/// Distinct roots for a batch.
pub(crate) fn roots(count: u8) -> Vec<B256> {
    (1..=count).map(B256::repeat_byte).collect()
}
