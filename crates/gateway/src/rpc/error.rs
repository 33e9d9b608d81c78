//! RPC-specific error types.

use alloy_transport::TransportError;
use thiserror::Error;

/// RPC-specific error type.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport error from alloy.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Proof not found.
    #[error("Proof not found: {0}")]
    ProofNotFound(String),

    /// Invalid response from RPC.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
