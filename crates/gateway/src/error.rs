//! Error types for the gateway.
//!
//! Every failure of a `/query` request ends up as one [`GatewayError`]. The
//! variant decides the HTTP status and the body the caller sees; internal
//! detail of upstream failures stays in the logs.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::{
    constants::{UNIMPLEMENTED_FUNCTION_MESSAGE, UPSTREAM_FAILURE_MESSAGE},
    merkle::MerkleError,
    rpc::RpcError,
};

/// Main error type for the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The calldata selector does not match any function of the resolver interface.
    #[error("selector decode error: {0}")]
    SelectorDecode(String),

    /// The function exists on the resolver interface but the gateway has no handler for it.
    #[error("function not implemented: {0}")]
    UnimplementedFunction(String),

    /// The arguments following a known selector could not be decoded.
    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),

    /// The backward scan of L1 history found no state batch.
    #[error("No state root batches found")]
    BatchNotFound,

    /// The latest batch is inconsistent (undecodable input, wrong root count, empty).
    #[error("invalid state batch: {0}")]
    InvalidBatch(String),

    /// A contract returned data that does not match its interface.
    #[error("contract error: {0}")]
    Contract(String),

    /// An upstream chain-client call failed.
    #[error("upstream RPC error: {0}")]
    Upstream(#[from] RpcError),

    /// The request exceeded its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<MerkleError> for GatewayError {
    fn from(err: MerkleError) -> Self {
        Self::InvalidBatch(err.to_string())
    }
}

impl GatewayError {
    /// HTTP status reported to the caller.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::SelectorDecode(_) | Self::UnimplementedFunction(_) | Self::InvalidCalldata(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BatchNotFound => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBatch(_) | Self::Contract(_) | Self::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn public_message(&self) -> String {
        match self {
            Self::SelectorDecode(reason) | Self::InvalidCalldata(reason) => reason.clone(),
            Self::UnimplementedFunction(_) => UNIMPLEMENTED_FUNCTION_MESSAGE.to_string(),
            Self::BatchNotFound => self.to_string(),
            Self::InvalidBatch(_) | Self::Contract(_) | Self::Upstream(_) => {
                UPSTREAM_FAILURE_MESSAGE.to_string()
            }
            Self::Timeout(_) => "request timed out".to_string(),
        }
    }

    /// Short label used for the `outcome` metric label.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::SelectorDecode(_) => "selector_decode",
            Self::UnimplementedFunction(_) => "unimplemented",
            Self::InvalidCalldata(_) => "invalid_calldata",
            Self::BatchNotFound => "batch_not_found",
            Self::InvalidBatch(_) => "invalid_batch",
            Self::Contract(_) => "contract",
            Self::Upstream(_) => "upstream",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(GatewayError::SelectorDecode("no match".into()), StatusCode::BAD_REQUEST)]
    #[case(GatewayError::UnimplementedFunction("gateway()".into()), StatusCode::BAD_REQUEST)]
    #[case(GatewayError::InvalidCalldata("short".into()), StatusCode::BAD_REQUEST)]
    #[case(GatewayError::BatchNotFound, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(GatewayError::InvalidBatch("size".into()), StatusCode::BAD_GATEWAY)]
    #[case(GatewayError::Contract("bad".into()), StatusCode::BAD_GATEWAY)]
    #[case(GatewayError::Upstream(RpcError::Transport("reset".into())), StatusCode::BAD_GATEWAY)]
    #[case(GatewayError::Timeout(Duration::from_secs(1)), StatusCode::GATEWAY_TIMEOUT)]
    fn test_status_codes(#[case] err: GatewayError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[test]
    fn test_upstream_detail_is_hidden() {
        let err =
            GatewayError::Upstream(RpcError::Transport("http://10.0.0.3:8545 refused".into()));
        assert_eq!(err.public_message(), UPSTREAM_FAILURE_MESSAGE);
        assert!(!err.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn test_unimplemented_message() {
        let err = GatewayError::UnimplementedFunction("gateway()".into());
        assert_eq!(err.public_message(), "Function not implemented");
    }

    #[test]
    fn test_selector_decode_keeps_reason() {
        let err =
            GatewayError::SelectorDecode("no matching function for selector 0x12345678".into());
        assert_eq!(err.public_message(), "no matching function for selector 0x12345678");
    }
}
