//! Error types for the bmark daemon.

use bmark_rpc::protocol::RpcError;

/// Errors that can occur in the daemon
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Codec error
    #[error("Codec error: {0}")]
    Codec(#[from] bmark_rpc::transport::CodecError),

    /// The blocking store task was cancelled or panicked
    #[error("Store task failed: {0}")]
    StoreTask(String),
}

impl From<DaemonError> for RpcError {
    fn from(err: DaemonError) -> Self {
        match err {
            DaemonError::Io(e) => RpcError::internal_error(e.to_string()),
            DaemonError::Json(e) => RpcError::internal_error(e.to_string()),
            DaemonError::InvalidParams(msg) => RpcError::invalid_params(msg),
            DaemonError::MethodNotFound(name) => RpcError::method_not_found(name),
            DaemonError::Codec(e) => RpcError::internal_error(e.to_string()),
            DaemonError::StoreTask(msg) => RpcError::internal_error(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;
