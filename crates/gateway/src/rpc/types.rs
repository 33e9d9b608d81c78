//! Proof types returned by the L2 client.

use alloy_primitives::{B256, Bytes, U256};
use alloy_rpc_types_eth::EIP1186AccountProofResponse;

/// Proof for one storage slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSlotProof {
    /// The storage key that was requested.
    pub key: B256,
    /// The raw 32-byte word stored at `key`.
    pub value: U256,
    /// Storage trie nodes from the storage root down to the slot.
    pub proof: Vec<Bytes>,
}

/// Account proof together with the proofs of the requested slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStorageProof {
    /// State trie nodes from the state root down to the account.
    pub account_proof: Vec<Bytes>,
    /// One entry per requested storage key, in request order.
    pub storage_proof: Vec<StorageSlotProof>,
}

impl AccountStorageProof {
    /// Converts an `eth_getProof` response, pairing each storage proof with
    /// the key it was requested for.
    pub fn from_response(keys: &[B256], response: EIP1186AccountProofResponse) -> Self {
        let storage_proof = keys
            .iter()
            .zip(response.storage_proof)
            .map(|(key, slot)| StorageSlotProof { key: *key, value: slot.value, proof: slot.proof })
            .collect();

        Self { account_proof: response.account_proof, storage_proof }
    }
}
