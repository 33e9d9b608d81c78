//! Contract bindings for the L1 state commitment chain, address manager, and resolver stub.

mod address_manager;
mod resolver_stub;
mod state_commitment_chain;

pub use address_manager::{IAddressManager, resolve_address};
pub use resolver_stub::{IResolverStub, read_l2_resolver};
pub use state_commitment_chain::{
    IStateCommitmentChain, decode_append_state_batch, state_batch_appended_filter,
};
