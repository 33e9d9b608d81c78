//! Shared chain context handed to every pipeline stage.

use std::sync::Arc;

use alloy_primitives::Address;

use crate::{
    constants::DEFAULT_SCAN_WINDOW,
    rpc::{L1Client, L2Client},
};

/// Clients and addresses shared by all requests.
///
/// Built once at startup. Every field is read-only, so concurrent requests
/// share a context by cloning the `Arc`s.
#[derive(Clone)]
pub struct ChainContext {
    /// L1 client used to read the commitment chain and resolver stubs.
    pub l1: Arc<dyn L1Client>,
    /// L2 client used to fetch storage proofs.
    pub l2: Arc<dyn L2Client>,
    /// Address of the state commitment chain on L1.
    pub state_commitment_chain: Address,
    /// Number of L1 blocks per `eth_getLogs` window.
    pub scan_window: u64,
}

impl std::fmt::Debug for ChainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainContext")
            .field("state_commitment_chain", &self.state_commitment_chain)
            .field("scan_window", &self.scan_window)
            .finish_non_exhaustive()
    }
}

impl ChainContext {
    /// Creates a context with the default scan window.
    pub fn new(
        l1: Arc<dyn L1Client>,
        l2: Arc<dyn L2Client>,
        state_commitment_chain: Address,
    ) -> Self {
        Self { l1, l2, state_commitment_chain, scan_window: DEFAULT_SCAN_WINDOW }
    }

    /// Sets the scan window. Zero is clamped to one block.
    pub fn with_scan_window(mut self, scan_window: u64) -> Self {
        self.scan_window = scan_window.max(1);
        self
    }
}
