//! `StateCommitmentChain` contract bindings.
//!
//! The chain emits `StateBatchAppended` for every batch of L2 state roots
//! submitted to L1. The event only carries the batch root and size; the roots
//! themselves are recovered from the `appendStateBatch` calldata.

use alloy_primitives::{Address, B256, Bytes};
use alloy_rpc_types_eth::Filter;
use alloy_sol_types::{SolCall, SolEvent, sol};

use crate::GatewayError;

sol! {
    /// `StateCommitmentChain` contract interface.
    interface IStateCommitmentChain {
        /// Emitted once per appended batch of state roots.
        event StateBatchAppended(
            uint256 indexed _batchIndex,
            bytes32 _batchRoot,
            uint256 _batchSize,
            uint256 _prevTotalElements,
            bytes _extraData
        );

        /// Appends a batch of state roots to the chain.
        function appendStateBatch(
            bytes32[] calldata _batch,
            uint256 _shouldStartAtElement
        ) external;
    }
}

/// Builds the `eth_getLogs` filter for `StateBatchAppended` events emitted by
/// `chain` within the inclusive block range `[from_block, to_block]`.
pub fn state_batch_appended_filter(chain: Address, from_block: u64, to_block: u64) -> Filter {
    Filter::new()
        .address(chain)
        .event_signature(IStateCommitmentChain::StateBatchAppended::SIGNATURE_HASH)
        .from_block(from_block)
        .to_block(to_block)
}

/// Decodes the ordered state roots from `appendStateBatch` calldata.
pub fn decode_append_state_batch(input: &Bytes) -> Result<Vec<B256>, GatewayError> {
    let call = IStateCommitmentChain::appendStateBatchCall::abi_decode(input).map_err(|e| {
        GatewayError::InvalidBatch(format!("failed to decode appendStateBatch input: {e}"))
    })?;
    Ok(call._batch)
}
