//! Storage slot derivation and L2 storage proofs.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use tracing::debug;

use crate::{
    ChainContext, GatewayResult,
    rpc::{L2Client, RpcError},
};

/// Storage slot of `mapping(bytes32 => address)` entry `node` for a mapping
/// declared at `base_slot`: `keccak256(node || base_slot)`, both as 32-byte words.
pub fn addr_record_slot(node: B256, base_slot: u64) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(node.as_slice());
    preimage[32..].copy_from_slice(&U256::from(base_slot).to_be_bytes::<32>());
    keccak256(preimage)
}

/// Interprets a storage word as an address (its low 20 bytes).
pub fn address_from_word(word: U256) -> Address {
    Address::from_word(B256::from(word))
}

/// RLP-encoded witnesses for one storage slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageWitness {
    /// RLP list of the account proof nodes.
    pub state_trie_witness: Bytes,
    /// RLP list of the storage proof nodes.
    pub storage_trie_witness: Bytes,
    /// Raw value of the slot.
    pub value: U256,
}

impl StorageWitness {
    /// The slot value read as an address record.
    pub fn address(&self) -> Address {
        address_from_word(self.value)
    }
}

/// Fetches storage proofs from L2.
#[derive(Clone)]
pub struct StorageProofFetcher {
    l2: Arc<dyn L2Client>,
}

impl std::fmt::Debug for StorageProofFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageProofFetcher").finish_non_exhaustive()
    }
}

impl StorageProofFetcher {
    /// Creates a fetcher using the L2 client of `context`.
    pub fn new(context: &ChainContext) -> Self {
        Self { l2: Arc::clone(&context.l2) }
    }

    /// Proves `slot` of `address` at `l2_block` via `eth_getProof`.
    pub async fn fetch(
        &self,
        address: Address,
        slot: B256,
        l2_block: u64,
    ) -> GatewayResult<StorageWitness> {
        let proof = self.l2.get_proof(address, vec![slot], l2_block).await?;

        let slot_proof = proof.storage_proof.into_iter().next().ok_or_else(|| {
            RpcError::ProofNotFound(format!("no storage proof for slot {slot} of {address}"))
        })?;

        debug!(
            %address,
            %slot,
            l2_block,
            account_nodes = proof.account_proof.len(),
            storage_nodes = slot_proof.proof.len(),
            "Fetched storage proof"
        );

        Ok(StorageWitness {
            state_trie_witness: Bytes::from(alloy_rlp::encode(&proof.account_proof)),
            storage_trie_witness: Bytes::from(alloy_rlp::encode(&slot_proof.proof)),
            value: slot_proof.value,
        })
    }
}
