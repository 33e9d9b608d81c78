//! Binary Merkle tree over padded state roots.
//!
//! Leaves are used as-is (they are already hashes). The leaf set is padded on
//! the right with `H(0x00 * 32)` up to the next power of two, and every parent
//! is `H(left || right)` in positional order. Pairs are never sorted: the
//! on-chain verifier walks the proof using the bits of the leaf index.

use std::marker::PhantomData;

use alloy_primitives::{B256, keccak256};
use thiserror::Error;

/// Hash function used to build a [`MerkleTree`].
pub trait MerkleHasher {
    /// Hashes arbitrary bytes into a node.
    fn hash(data: &[u8]) -> B256;

    /// Hashes two children into their parent, left child first.
    fn hash_pair(left: &B256, right: &B256) -> B256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(left.as_slice());
        buf[32..].copy_from_slice(right.as_slice());
        Self::hash(&buf)
    }

    /// The leaf used to pad the tree to a power of two: `hash(0x00 * 32)`.
    fn filler() -> B256 {
        Self::hash(&[0u8; 32])
    }
}

/// Keccak-256, the hasher the commitment chain uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl MerkleHasher for Keccak256Hasher {
    fn hash(data: &[u8]) -> B256 {
        keccak256(data)
    }
}

/// Errors raised while building trees or proofs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree without leaves")]
    Empty,
    /// The requested leaf is outside the padded tree.
    #[error("leaf index {index} out of bounds for {len} leaves")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Padded leaf count.
        len: usize,
    },
}

/// Sibling path proving one leaf of a padded tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleInclusionProof {
    /// Position of the leaf in the padded tree.
    pub index: u64,
    /// Sibling hashes ordered from the leaf level up to just below the root.
    pub siblings: Vec<B256>,
}

impl MerkleInclusionProof {
    /// Folds `leaf` with the siblings, choosing the pair order from the index bits.
    pub fn compute_root<H: MerkleHasher>(&self, leaf: B256) -> B256 {
        let mut node = leaf;
        let mut position = self.index;
        for sibling in &self.siblings {
            node = if position & 1 == 0 {
                H::hash_pair(&node, sibling)
            } else {
                H::hash_pair(sibling, &node)
            };
            position >>= 1;
        }
        node
    }

    /// Returns true if `leaf` and this proof reproduce `root`.
    pub fn verify<H: MerkleHasher>(&self, leaf: B256, root: B256) -> bool {
        self.compute_root::<H>(leaf) == root
    }
}

/// A fully materialised binary Merkle tree.
#[derive(Debug, Clone)]
pub struct MerkleTree<H = Keccak256Hasher> {
    /// `layers[0]` holds the padded leaves, the last layer holds the root.
    layers: Vec<Vec<B256>>,
    /// Number of leaves before padding.
    real_len: usize,
    _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Pads `leaves` to a power of two and builds every layer up to the root.
    pub fn new(leaves: &[B256]) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }

        let padded_len = leaves.len().next_power_of_two();
        let mut current = Vec::with_capacity(padded_len);
        current.extend_from_slice(leaves);
        current.resize(padded_len, H::filler());

        let mut layers = Vec::with_capacity(padded_len.trailing_zeros() as usize + 1);
        while current.len() > 1 {
            let parents =
                current.chunks_exact(2).map(|pair| H::hash_pair(&pair[0], &pair[1])).collect();
            layers.push(current);
            current = parents;
        }
        layers.push(current);

        Ok(Self { layers, real_len: leaves.len(), _hasher: PhantomData })
    }

    /// The root of the tree.
    pub fn root(&self) -> B256 {
        self.layers.last().and_then(|layer| layer.first()).copied().unwrap_or_default()
    }

    /// The padded leaf layer.
    pub fn leaves(&self) -> &[B256] {
        self.layers.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// The leaf at `index` in the padded layer.
    pub fn leaf(&self, index: usize) -> Option<B256> {
        self.leaves().get(index).copied()
    }

    /// Number of leaves before padding.
    pub const fn real_len(&self) -> usize {
        self.real_len
    }

    /// Number of leaves after padding; always a power of two.
    pub fn padded_len(&self) -> usize {
        self.leaves().len()
    }

    /// Index of the last slot of the padded layer.
    ///
    /// This is the leaf the gateway proves. When the real leaf count is not a
    /// power of two it is a padding leaf, not the last real state root.
    pub fn last_index(&self) -> usize {
        self.padded_len() - 1
    }

    /// Builds the inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleInclusionProof, MerkleError> {
        let len = self.padded_len();
        if index >= len {
            return Err(MerkleError::IndexOutOfBounds { index, len });
        }

        let mut position = index;
        let siblings = self
            .layers
            .iter()
            .take(self.layers.len() - 1)
            .map(|layer| {
                let sibling = layer[position ^ 1];
                position >>= 1;
                sibling
            })
            .collect();

        Ok(MerkleInclusionProof { index: index as u64, siblings })
    }
}
