//! Full gateway service lifecycle.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use alloy_primitives::Address;
use eyre::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    ChainContext, CommitmentChainSource, Dispatcher, GatewayConfig, L1Client, L1ClientConfig,
    L1ClientImpl, L2ClientConfig, L2ClientImpl, ProofPipeline,
    constants::STATE_COMMITMENT_CHAIN_NAME, contracts::resolve_address,
};

/// Runs the full gateway service lifecycle.
///
/// Steps:
/// 1. Initialise logging and metrics
/// 2. Create the L1 and L2 clients
/// 3. Resolve the state commitment chain address
/// 4. Build the proof pipeline and dispatcher
/// 5. Serve HTTP until SIGTERM or SIGINT
pub async fn run(config: GatewayConfig) -> Result<()> {
    config.log.init_tracing_subscriber()?;
    config.validate()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Gateway starting");

    let cancel = CancellationToken::new();
    crate::setup_signal_handler(cancel.clone());

    if config.metrics.enabled {
        let addr = SocketAddr::new(config.metrics.addr, config.metrics.port);
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| eyre::eyre!("failed to install Prometheus recorder: {e}"))?;
        info!(%addr, "Metrics server started");
    }

    // No-ops if no recorder is installed.
    crate::record_startup_metrics(env!("CARGO_PKG_VERSION"));

    let l1_config = L1ClientConfig::new(config.l1_eth_rpc.clone())
        .with_timeout(config.rpc_timeout)
        .with_skip_tls_verify(config.skip_tls_verify);
    let l1_client = Arc::new(L1ClientImpl::new(l1_config)?);
    info!(endpoint = %config.l1_eth_rpc, "L1 client initialized");

    let l2_config = L2ClientConfig::new(config.l2_eth_rpc.clone())
        .with_timeout(config.rpc_timeout)
        .with_skip_tls_verify(config.skip_tls_verify);
    let l2_client = Arc::new(L2ClientImpl::new(l2_config)?);
    info!(endpoint = %config.l2_eth_rpc, "L2 client initialized");

    let state_commitment_chain =
        resolve_commitment_chain(l1_client.as_ref(), config.commitment_chain).await?;

    let context = ChainContext::new(l1_client, l2_client, state_commitment_chain)
        .with_scan_window(config.scan_window);
    let dispatcher = Dispatcher::new(Arc::new(ProofPipeline::new(&context)));

    let ready = Arc::new(AtomicBool::new(false));
    let app = crate::router(dispatcher, Arc::clone(&ready), config.http.request_timeout);
    let server_handle: JoinHandle<Result<()>> = {
        let addr = SocketAddr::new(config.http.addr, config.http.port);
        let server_cancel = cancel.clone();
        tokio::spawn(async move { crate::serve(addr, app, server_cancel).await })
    };

    ready.store(true, Ordering::SeqCst);
    info!(
        %state_commitment_chain,
        scan_window = context.scan_window,
        request_timeout = ?config.http.request_timeout,
        "Service is ready"
    );

    cancel.cancelled().await;
    info!("Shutdown signal received, stopping service...");
    ready.store(false, Ordering::SeqCst);

    match server_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Gateway server error during shutdown"),
        Err(e) => warn!(error = %e, "Gateway server task panicked"),
    }

    info!("Service stopped");
    Ok(())
}

/// Returns the configured state commitment chain address, looking it up in
/// the address manager when one was given instead.
pub async fn resolve_commitment_chain(
    l1: &dyn L1Client,
    source: CommitmentChainSource,
) -> Result<Address> {
    match source {
        CommitmentChainSource::Direct(address) => Ok(address),
        CommitmentChainSource::AddressManager(manager) => {
            Ok(resolve_address(l1, manager, STATE_COMMITMENT_CHAIN_NAME).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::test_utils::MockL1;

    #[tokio::test]
    async fn test_direct_address_skips_lookup() {
        let l1 = MockL1::default();
        let chain = Address::repeat_byte(0x5c);

        let resolved =
            resolve_commitment_chain(&l1, CommitmentChainSource::Direct(chain)).await.unwrap();

        assert_eq!(resolved, chain);
        assert_eq!(l1.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_through_address_manager() {
        let chain = Address::repeat_byte(0x5c);
        let l1 = MockL1::default().with_call_output(Bytes::from(chain.abi_encode()));

        let resolved = resolve_commitment_chain(
            &l1,
            CommitmentChainSource::AddressManager(Address::repeat_byte(1)),
        )
        .await
        .unwrap();

        assert_eq!(resolved, chain);
        assert_eq!(l1.calls(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_chain_is_startup_error() {
        let l1 = MockL1::default().with_call_output(Bytes::from(Address::ZERO.abi_encode()));

        let result = resolve_commitment_chain(
            &l1,
            CommitmentChainSource::AddressManager(Address::repeat_byte(1)),
        )
        .await;

        assert!(result.is_err());
    }
}
