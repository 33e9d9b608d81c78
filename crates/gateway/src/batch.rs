//! Locates the most recent state batch appended on L1.
//!
//! The `StateBatchAppended` event carries the batch header but not the roots,
//! so once the latest event is found its transaction input is decoded as
//! `appendStateBatch` to recover the full, ordered root list.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use tracing::{debug, info};

use crate::{
    ChainContext, GatewayError, GatewayResult,
    contracts::{IStateCommitmentChain, decode_append_state_batch, state_batch_appended_filter},
    metrics::SCANNED_WINDOWS_TOTAL,
    rpc::L1Client,
};

/// Header of one committed batch of L2 state roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateBatchHeader {
    /// Position of the batch in the commitment chain.
    pub batch_index: U256,
    /// Merkle root over the batch's state roots.
    pub batch_root: B256,
    /// Number of state roots in the batch.
    pub batch_size: U256,
    /// Number of state roots committed before this batch.
    pub prev_total_elements: U256,
    /// Opaque data attached by the submitter.
    pub extra_data: Bytes,
}

impl From<IStateCommitmentChain::StateBatchAppended> for StateBatchHeader {
    fn from(event: IStateCommitmentChain::StateBatchAppended) -> Self {
        Self {
            batch_index: event._batchIndex,
            batch_root: event._batchRoot,
            batch_size: event._batchSize,
            prev_total_elements: event._prevTotalElements,
            extra_data: event._extraData,
        }
    }
}

/// A batch header together with the roots it commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchBundle {
    /// Header from the `StateBatchAppended` event.
    pub header: StateBatchHeader,
    /// State roots in submission order.
    pub state_roots: Vec<B256>,
}

impl BatchBundle {
    /// L2 block number covered by the batch: `prev_total_elements + batch_size`.
    pub fn l2_block_number(&self) -> GatewayResult<u64> {
        let block = self
            .header
            .prev_total_elements
            .checked_add(self.header.batch_size)
            .ok_or_else(|| GatewayError::InvalidBatch("L2 block number overflows".into()))?;

        u64::try_from(block)
            .map_err(|_| GatewayError::InvalidBatch(format!("L2 block number {block} exceeds u64")))
    }
}

/// Scans L1 backwards for the latest `StateBatchAppended` event.
#[derive(Clone)]
pub struct BatchLocator {
    l1: Arc<dyn L1Client>,
    chain: Address,
    scan_window: u64,
}

impl std::fmt::Debug for BatchLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLocator")
            .field("chain", &self.chain)
            .field("scan_window", &self.scan_window)
            .finish_non_exhaustive()
    }
}

impl BatchLocator {
    /// Creates a locator reading the commitment chain from `context`.
    pub fn new(context: &ChainContext) -> Self {
        Self {
            l1: Arc::clone(&context.l1),
            chain: context.state_commitment_chain,
            scan_window: context.scan_window.max(1),
        }
    }

    /// Returns the most recent batch and its roots.
    ///
    /// Windows of `scan_window` blocks are queried from the L1 head down to
    /// block 0. The first window holding any event wins, and within it the
    /// event with the greatest `(block_number, log_index)` is selected. Any
    /// RPC failure aborts the scan.
    pub async fn latest_batch(&self) -> GatewayResult<BatchBundle> {
        let head = self.l1.block_number().await?;
        let mut to_block = head;

        loop {
            let from_block = to_block.saturating_sub(self.scan_window - 1);
            let filter = state_batch_appended_filter(self.chain, from_block, to_block);
            let logs = self.l1.get_logs(&filter).await?;
            metrics::counter!(SCANNED_WINDOWS_TOTAL).increment(1);

            let latest = logs
                .into_iter()
                .filter(|log| !log.removed)
                .max_by_key(|log| (log.block_number, log.log_index));

            if let Some(log) = latest {
                return self.load_bundle(log).await;
            }

            debug!(from_block, to_block, "No state batch in window");
            if from_block == 0 {
                break;
            }
            to_block = from_block - 1;
        }

        info!(head, chain = %self.chain, "Reached genesis without finding a state batch");
        Err(GatewayError::BatchNotFound)
    }

    async fn load_bundle(&self, log: Log) -> GatewayResult<BatchBundle> {
        let tx_hash = log.transaction_hash.ok_or_else(|| {
            GatewayError::InvalidBatch("StateBatchAppended log has no transaction hash".into())
        })?;

        let event = IStateCommitmentChain::StateBatchAppended::decode_log(&log.inner).map_err(|e| {
            GatewayError::InvalidBatch(format!("undecodable StateBatchAppended: {e}"))
        })?;
        let header = StateBatchHeader::from(event.data);

        let input = self.l1.transaction_input(tx_hash).await?;
        let state_roots = decode_append_state_batch(&input)?;

        if U256::from(state_roots.len()) != header.batch_size {
            return Err(GatewayError::InvalidBatch(format!(
                "batch {} declares {} roots but transaction {tx_hash} submitted {}",
                header.batch_index,
                header.batch_size,
                state_roots.len()
            )));
        }

        info!(
            batch_index = %header.batch_index,
            batch_size = state_roots.len(),
            block = ?log.block_number,
            %tx_hash,
            "Located latest state batch"
        );
        Ok(BatchBundle { header, state_roots })
    }
}
