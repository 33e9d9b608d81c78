use std::time::Duration;

use alloy_network::Ethereum;
use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport_http::{Http, reqwest::Client};
use url::Url;

/// Shared type alias for the L1 and L2 HTTP providers.
/// Uses `RootProvider` directly since the gateway only performs read operations.
pub type HttpProvider = RootProvider<Ethereum>;

mod error;
mod l1_client;
mod l2_client;
mod traits;
mod types;

pub use error::{RpcError, RpcResult};
pub use l1_client::{L1ClientConfig, L1ClientImpl};
pub use l2_client::{L2ClientConfig, L2ClientImpl};
pub use traits::{L1Client, L2Client};
pub use types::{AccountStorageProof, StorageSlotProof};

/// Builds a read-only provider whose HTTP client enforces `timeout` on every call.
fn build_http_provider(
    endpoint: Url,
    timeout: Duration,
    skip_tls_verify: bool,
    layer: &'static str,
) -> RpcResult<HttpProvider> {
    let mut builder = Client::builder().timeout(timeout);

    if skip_tls_verify {
        tracing::warn!(layer, "TLS certificate verification is disabled for RPC connection");
        builder = builder.danger_accept_invalid_certs(true);
    }

    let client = builder
        .build()
        .map_err(|e| RpcError::Connection(format!("Failed to build HTTP client: {e}")))?;

    let http = Http::with_client(client, endpoint);
    let rpc_client = RpcClient::new(http, false);

    Ok(RootProvider::new(rpc_client))
}
