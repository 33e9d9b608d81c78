//! Packages the batch, Merkle proof and storage witnesses into the
//! `addrWithProof` argument tuple.

use alloy_primitives::{B256, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    GatewayResult,
    batch::{BatchBundle, StateBatchHeader},
    contracts::IResolverStub,
    merkle::{MerkleHasher, MerkleInclusionProof, MerkleTree},
    storage::StorageWitness,
};

/// Everything the on-chain verifier needs for one `node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofBundle {
    /// Name hash being resolved.
    pub node: B256,
    /// Leaf of the batch tree that the inclusion proof opens.
    pub state_root: B256,
    /// Header of the batch containing `state_root`.
    pub state_root_batch_header: StateBatchHeader,
    /// Inclusion proof of `state_root` in the batch.
    pub state_root_proof: MerkleInclusionProof,
    /// RLP-encoded account proof.
    pub state_trie_witness: Bytes,
    /// RLP-encoded storage proof.
    pub storage_trie_witness: Bytes,
}

/// Builds the proof bundle for the leaf at `index` of `tree`.
pub fn assemble<H: MerkleHasher>(
    node: B256,
    batch: &BatchBundle,
    tree: &MerkleTree<H>,
    index: usize,
    witness: StorageWitness,
) -> GatewayResult<ProofBundle> {
    let state_root_proof = tree.proof(index)?;
    let state_root = tree.leaves()[index];

    Ok(ProofBundle {
        node,
        state_root,
        state_root_batch_header: batch.header.clone(),
        state_root_proof,
        state_trie_witness: witness.state_trie_witness,
        storage_trie_witness: witness.storage_trie_witness,
    })
}

impl ProofBundle {
    /// The `L2StateProof` struct as declared by the resolver stub.
    pub fn to_l2_state_proof(&self) -> IResolverStub::L2StateProof {
        let header = &self.state_root_batch_header;
        IResolverStub::L2StateProof {
            stateRoot: self.state_root,
            stateRootBatchHeader: IResolverStub::ChainBatchHeader {
                batchIndex: header.batch_index,
                batchRoot: header.batch_root,
                batchSize: header.batch_size,
                prevTotalElements: header.prev_total_elements,
                extraData: header.extra_data.clone(),
            },
            stateRootProof: IResolverStub::ChainInclusionProof {
                index: U256::from(self.state_root_proof.index),
                siblings: self.state_root_proof.siblings.clone(),
            },
            stateTrieWitness: self.state_trie_witness.clone(),
            storageTrieWitness: self.storage_trie_witness.clone(),
        }
    }

    /// Full calldata for `addrWithProof(node, proof)`, selector included.
    pub fn encode_addr_with_proof(&self) -> Bytes {
        IResolverStub::addrWithProofCall { node: self.node, proof: self.to_l2_state_proof() }
            .abi_encode()
            .into()
    }
}
