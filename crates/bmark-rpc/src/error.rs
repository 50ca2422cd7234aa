//! Unified error type for RPC operations.

use crate::client::ClientError;
use crate::transport::CodecError;

/// Unified error type for RPC operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Connection closed")]
    Disconnected,

    #[error("Request timeout")]
    Timeout,

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Unexpected response")]
    UnexpectedResponse,
}

impl From<crate::protocol::RpcError> for Error {
    fn from(e: crate::protocol::RpcError) -> Self {
        Self::Rpc {
            code: e.code,
            message: e.message,
        }
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Io(e) => Self::Io(e),
            ClientError::Codec(e) => Self::Codec(e),
            ClientError::Json(e) => Self::Json(e),
            ClientError::Rpc { code, message } => Self::Rpc { code, message },
            ClientError::ConnectionClosed => Self::Disconnected,
            ClientError::Timeout => Self::Timeout,
            ClientError::UnexpectedResponse => Self::UnexpectedResponse,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RpcError;

    #[test]
    fn test_error_from_rpc_error() {
        let err: Error = RpcError::method_not_found("missing").into();

        match err {
            Error::Rpc { code, message } => {
                assert_eq!(code, crate::protocol::METHOD_NOT_FOUND);
                assert!(message.contains("missing"));
            }
            other => panic!("Expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_client_error_variants() {
        let err: Error = ClientError::ConnectionClosed.into();
        assert!(matches!(err, Error::Disconnected));

        let err: Error = ClientError::Timeout.into();
        assert!(matches!(err, Error::Timeout));

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let err: Error = ClientError::Io(io_err).into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("pipe broken"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Disconnected.to_string(), "Connection closed");
        assert_eq!(Error::Timeout.to_string(), "Request timeout");
    }
}
