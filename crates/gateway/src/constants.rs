//! Constants used throughout the gateway.

use std::time::Duration;

/// Default number of L1 blocks queried per `eth_getLogs` call while scanning
/// backwards for the latest state batch.
pub const DEFAULT_SCAN_WINDOW: u64 = 100;

/// Storage slot of the L2 resolver's `mapping(bytes32 => address)` address records.
pub const ADDR_SLOT_INDEX: u64 = 1;

/// Name under which the state commitment chain is registered in the address manager.
pub const STATE_COMMITMENT_CHAIN_NAME: &str = "OVM_StateCommitmentChain";

/// Default timeout for a single upstream RPC call.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for handling one `/query` request end to end.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default HTTP listening port.
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Body returned when a selector is known but has no handler.
pub const UNIMPLEMENTED_FUNCTION_MESSAGE: &str = "Function not implemented";

/// Body returned for any upstream failure. Internal detail stays in the logs.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "upstream RPC failure";
