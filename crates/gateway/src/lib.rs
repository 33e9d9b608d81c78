#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod assembler;
pub use assembler::{ProofBundle, assemble};

mod batch;
pub use batch::{BatchBundle, BatchLocator, StateBatchHeader};

mod config;
pub use config::{
    CommitmentChainSource, ConfigError, GatewayConfig, HttpServerConfig, MetricsConfig,
    validate_url,
};

mod constants;
pub use constants::*;

mod context;
pub use context::ChainContext;

mod contracts;
pub use contracts::{
    IAddressManager, IResolverStub, IStateCommitmentChain, decode_append_state_batch,
    read_l2_resolver, resolve_address, state_batch_appended_filter,
};

mod dispatcher;
pub use dispatcher::{CallHandler, Dispatcher, QueryRequest, QueryResponse, SupportedFunction};

mod error;
pub use error::{GatewayError, GatewayResult};

mod logging;
pub use logging::{LogConfig, LogFormat, init_test_tracing};

mod merkle;
pub use merkle::{
    Keccak256Hasher, MerkleError, MerkleHasher, MerkleInclusionProof, MerkleTree,
};

mod metrics;
pub use metrics::{
    INFO, LABEL_OUTCOME, LABEL_VERSION, OUTCOME_OK, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL,
    SCANNED_WINDOWS_TOTAL, UP, record_request, record_startup_metrics,
};

mod pipeline;
pub use pipeline::ProofPipeline;

mod rpc;
pub use rpc::{
    AccountStorageProof, HttpProvider, L1Client, L1ClientConfig, L1ClientImpl, L2Client,
    L2ClientConfig, L2ClientImpl, RpcError, RpcResult, StorageSlotProof,
};

mod server;
pub use server::{ErrorResponse, router, serve};

mod service;
pub use service::{resolve_commitment_chain, run};

mod signal;
pub use signal::setup_signal_handler;

mod storage;
pub use storage::{StorageProofFetcher, StorageWitness, addr_record_slot, address_from_word};

#[cfg(test)]
mod test_utils;
