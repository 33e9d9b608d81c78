//! Routes resolver calldata to its handler.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes, hex};
use alloy_sol_types::{SolCall, SolInterface};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    GatewayError, GatewayResult,
    contracts::{IResolverStub, IResolverStub::IResolverStubCalls},
};

/// Body of a `/query` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Resolver stub the call was made against on L1.
    pub address: Address,
    /// ABI-encoded call, selector included.
    pub data: Bytes,
}

/// Body of a successful `/query` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// ABI-encoded calldata for the stub's `...WithProof` counterpart.
    pub data: Bytes,
}

/// Selectors of the functions [`SupportedFunction`] has a variant for.
const HANDLED_SELECTORS: [[u8; 4]; 1] = [IResolverStub::addrCall::SELECTOR];

/// Resolver functions the gateway answers, with their decoded arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFunction {
    /// `addr(bytes32 node)`.
    Addr {
        /// Name hash to resolve.
        node: B256,
    },
}

impl SupportedFunction {
    /// Decodes `data` against the resolver stub interface.
    ///
    /// Fails with [`GatewayError::SelectorDecode`] when the selector matches
    /// nothing on the interface and [`GatewayError::UnimplementedFunction`]
    /// when the function has no variant here. Arguments are only checked for
    /// handled functions; those that do not decode fail with
    /// [`GatewayError::InvalidCalldata`].
    pub fn decode(data: &[u8]) -> GatewayResult<Self> {
        let Some(selector) = data.first_chunk::<4>() else {
            return Err(GatewayError::SelectorDecode(format!(
                "calldata of {} bytes has no function selector",
                data.len()
            )));
        };

        if !IResolverStubCalls::valid_selector(*selector) {
            return Err(GatewayError::SelectorDecode(format!(
                "no matching function for selector 0x{}",
                hex::encode(selector)
            )));
        }

        let call = match IResolverStubCalls::abi_decode(data) {
            Ok(call) => call,
            Err(e) if HANDLED_SELECTORS.contains(selector) => {
                return Err(GatewayError::InvalidCalldata(format!(
                    "selector 0x{}: {e}",
                    hex::encode(selector)
                )));
            }
            Err(_) => {
                return Err(GatewayError::UnimplementedFunction(format!(
                    "0x{}",
                    hex::encode(selector)
                )));
            }
        };

        let unimplemented = match call {
            IResolverStubCalls::addr(call) => return Ok(Self::Addr { node: call.node }),
            IResolverStubCalls::addrWithProof(_) => IResolverStub::addrWithProofCall::SIGNATURE,
            IResolverStubCalls::gateway(_) => IResolverStub::gatewayCall::SIGNATURE,
            IResolverStubCalls::l2resolver(_) => IResolverStub::l2resolverCall::SIGNATURE,
        };
        Err(GatewayError::UnimplementedFunction(unimplemented.to_string()))
    }

    /// Solidity signature of the function.
    pub const fn signature(&self) -> &'static str {
        match self {
            Self::Addr { .. } => IResolverStub::addrCall::SIGNATURE,
        }
    }
}

/// Produces the encoded answer for each [`SupportedFunction`].
#[async_trait]
pub trait CallHandler: Send + Sync {
    /// Answers `addr(node)` asked of the stub at `target`.
    async fn addr(&self, target: Address, node: B256) -> GatewayResult<Bytes>;
}

/// Decodes requests and invokes the matching handler once.
#[derive(Clone)]
pub struct Dispatcher {
    handler: Arc<dyn CallHandler>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher backed by `handler`.
    pub fn new(handler: Arc<dyn CallHandler>) -> Self {
        Self { handler }
    }

    /// Decodes `request` and returns the handler's encoded payload.
    pub async fn dispatch(&self, request: &QueryRequest) -> GatewayResult<QueryResponse> {
        let function = SupportedFunction::decode(&request.data)?;
        debug!(stub = %request.address, function = function.signature(), "Dispatching call");

        let data = match function {
            SupportedFunction::Addr { node } => self.handler.addr(request.address, node).await?,
        };
        Ok(QueryResponse { data })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// Handler that records its invocations and echoes the node back.
    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
        seen: Mutex<Vec<(Address, B256)>>,
        fail: bool,
    }

    #[async_trait]
    impl CallHandler for CountingHandler {
        async fn addr(&self, target: Address, node: B256) -> GatewayResult<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((target, node));
            if self.fail {
                return Err(GatewayError::BatchNotFound);
            }
            Ok(Bytes::copy_from_slice(node.as_slice()))
        }
    }

    fn request(data: Vec<u8>) -> QueryRequest {
        QueryRequest { address: Address::repeat_byte(0x0d), data: Bytes::from(data) }
    }

    #[tokio::test]
    async fn test_addr_invokes_handler_once() {
        let handler = Arc::new(CountingHandler::default());
        let dispatcher = Dispatcher::new(Arc::clone(&handler) as Arc<dyn CallHandler>);
        let node = B256::repeat_byte(0x77);

        let response = dispatcher
            .dispatch(&request(IResolverStub::addrCall { node }.abi_encode()))
            .await
            .unwrap();

        assert_eq!(response.data.as_ref(), node.as_slice());
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*handler.seen.lock().unwrap(), vec![(Address::repeat_byte(0x0d), node)]);
    }

    #[tokio::test]
    async fn test_known_but_unsupported_function() {
        let handler = Arc::new(CountingHandler::default());
        let dispatcher = Dispatcher::new(Arc::clone(&handler) as Arc<dyn CallHandler>);

        let err = dispatcher
            .dispatch(&request(IResolverStub::gatewayCall {}.abi_encode()))
            .await
            .unwrap_err();

        assert!(matches!(&err, GatewayError::UnimplementedFunction(s) if s == "gateway()"));
        assert_eq!(err.public_message(), "Function not implemented");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_selector() {
        let dispatcher = Dispatcher::new(Arc::new(CountingHandler::default()));

        let err = dispatcher.dispatch(&request(vec![0x12, 0x34, 0x56, 0x78])).await.unwrap_err();

        assert!(matches!(err, GatewayError::SelectorDecode(_)));
        assert_eq!(err.public_message(), "no matching function for selector 0x12345678");
    }

    #[tokio::test]
    async fn test_short_calldata() {
        let dispatcher = Dispatcher::new(Arc::new(CountingHandler::default()));

        let err = dispatcher.dispatch(&request(vec![0x3b, 0x3b])).await.unwrap_err();
        assert!(matches!(err, GatewayError::SelectorDecode(_)));
    }

    #[tokio::test]
    async fn test_truncated_arguments() {
        let dispatcher = Dispatcher::new(Arc::new(CountingHandler::default()));
        let mut data = IResolverStub::addrCall { node: B256::ZERO }.abi_encode();
        data.truncate(20);

        let err = dispatcher.dispatch(&request(data)).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCalldata(_)));
    }

    #[test]
    fn test_every_stub_function_is_classified() {
        let node = B256::repeat_byte(0x01);
        assert_eq!(
            SupportedFunction::decode(&IResolverStub::addrCall { node }.abi_encode()).unwrap(),
            SupportedFunction::Addr { node }
        );

        for (data, signature) in [
            (IResolverStub::gatewayCall {}.abi_encode(), "gateway()"),
            (IResolverStub::l2resolverCall {}.abi_encode(), "l2resolver()"),
        ] {
            let err = SupportedFunction::decode(&data).unwrap_err();
            assert!(matches!(err, GatewayError::UnimplementedFunction(s) if s == signature));
        }

        // Unhandled functions are rejected before their arguments are looked at.
        let mut with_proof = IResolverStub::addrWithProofCall::SELECTOR.to_vec();
        with_proof.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            SupportedFunction::decode(&with_proof),
            Err(GatewayError::UnimplementedFunction(_))
        ));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let handler = Arc::new(CountingHandler { fail: true, ..Default::default() });
        let dispatcher = Dispatcher::new(handler);

        let err = dispatcher
            .dispatch(&request(IResolverStub::addrCall { node: B256::ZERO }.abi_encode()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::BatchNotFound));
    }

    #[test]
    fn test_query_request_json() {
        let request: QueryRequest = serde_json::from_str(
            r#"{"address":"0x0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d","data":"0x3b3b57de"}"#,
        )
        .unwrap();

        assert_eq!(request.address, Address::repeat_byte(0x0d));
        assert_eq!(request.data.as_ref(), &[0x3b, 0x3b, 0x57, 0xde]);
    }
}
