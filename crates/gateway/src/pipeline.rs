//! The `addr` handler: chains batch lookup, Merkle proof, storage proof and
//! assembly for one request.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    ChainContext, GatewayResult,
    assembler::{ProofBundle, assemble},
    batch::BatchLocator,
    constants::ADDR_SLOT_INDEX,
    contracts::read_l2_resolver,
    dispatcher::CallHandler,
    merkle::{Keccak256Hasher, MerkleTree},
    rpc::L1Client,
    storage::{StorageProofFetcher, addr_record_slot},
};

/// Builds `addrWithProof` answers from live chain data.
#[derive(Clone)]
pub struct ProofPipeline {
    l1: Arc<dyn L1Client>,
    locator: BatchLocator,
    fetcher: StorageProofFetcher,
}

impl std::fmt::Debug for ProofPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofPipeline")
            .field("locator", &self.locator)
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

impl ProofPipeline {
    /// Creates the pipeline from the shared chain context.
    pub fn new(context: &ChainContext) -> Self {
        Self {
            l1: Arc::clone(&context.l1),
            locator: BatchLocator::new(context),
            fetcher: StorageProofFetcher::new(context),
        }
    }

    /// Builds the proof bundle for the address record of `node` held by the
    /// L2 resolver behind the stub at `target`.
    #[instrument(skip_all, fields(%target, %node))]
    pub async fn prove_addr(&self, target: Address, node: B256) -> GatewayResult<ProofBundle> {
        let l2_resolver = read_l2_resolver(self.l1.as_ref(), target).await?;

        let batch = self.locator.latest_batch().await?;
        let l2_block = batch.l2_block_number()?;

        let tree = MerkleTree::<Keccak256Hasher>::new(&batch.state_roots)?;
        let index = tree.last_index();

        let slot = addr_record_slot(node, ADDR_SLOT_INDEX);
        let witness = self.fetcher.fetch(l2_resolver, slot, l2_block).await?;

        debug!(
            %l2_resolver,
            l2_block,
            index,
            %slot,
            record = %witness.address(),
            "Assembling addr proof"
        );
        assemble(node, &batch, &tree, index, witness)
    }
}

#[async_trait]
impl CallHandler for ProofPipeline {
    async fn addr(&self, target: Address, node: B256) -> GatewayResult<Bytes> {
        Ok(self.prove_addr(target, node).await?.encode_addr_with_proof())
    }
}
