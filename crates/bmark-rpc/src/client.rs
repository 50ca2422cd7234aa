//! RPC client for talking to the bmark daemon.
//!
//! Wraps a Unix socket connection with request/response bookkeeping so callers
//! can issue concurrent requests and receive each response through its own
//! continuation. Typed helpers cover the two bookmark methods.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio::sync::{Mutex, oneshot};
use tokio_util::codec::Framed;
use tracing::trace;

use bmark_types::{BookmarkEntry, BookmarksResult, SearchBookmarksParams};

use crate::protocol::{
    METHOD_GET_BOOKMARKS, METHOD_SEARCH_BOOKMARKS, METHOD_SHUTDOWN, Message, Notification,
    Request, RequestId, Response, RpcError,
};
use crate::transport::{CodecError, JsonRpcCodec};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn runtime_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR").map_or_else(|_| std::env::temp_dir(), PathBuf::from)
}

/// Get the socket path for the bmark daemon.
///
/// On Linux, prefers `$XDG_RUNTIME_DIR` for proper runtime file handling.
/// Falls back to the system temp directory for cross-platform compatibility.
#[must_use]
pub fn socket_path() -> PathBuf {
    runtime_dir().join("bmark.sock")
}

/// Errors that can occur with the RPC client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error: {code} - {message}")]
    Rpc { code: i32, message: String },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected response type")]
    UnexpectedResponse,
}

impl From<RpcError> for ClientError {
    fn from(e: RpcError) -> Self {
        ClientError::Rpc {
            code: e.code,
            message: e.message,
        }
    }
}

/// Pending request waiting for a response
type PendingRequest = oneshot::Sender<Result<Response, ClientError>>;

type MessageSink = futures_util::stream::SplitSink<Framed<UnixStream, JsonRpcCodec>, Message>;

/// RPC client for communicating with the bmark daemon.
///
/// All request methods take `&self`, so a single client can be shared behind
/// an `Arc` and used from concurrently spawned tasks.
pub struct RpcClient {
    sender: Arc<Mutex<MessageSink>>,
    pending: Arc<Mutex<HashMap<RequestId, PendingRequest>>>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Connect to the bmark daemon at the default socket path.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if the socket connection fails.
    pub async fn connect() -> Result<Self, ClientError> {
        Self::connect_to(&socket_path()).await
    }

    /// Connect to the bmark daemon at a custom socket path.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if the socket connection fails.
    pub async fn connect_to(path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(path).await?;
        let framed = Framed::new(stream, JsonRpcCodec::new());
        let (sink, stream) = framed.split();

        let pending: Arc<Mutex<HashMap<RequestId, PendingRequest>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let pending_clone = pending.clone();

        tokio::spawn(async move {
            let mut stream = stream;
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Response(resp)) => {
                        let mut pending = pending_clone.lock().await;
                        if let Some(tx) = pending.remove(&resp.id) {
                            let _ = tx.send(Ok(resp));
                        }
                    }
                    Ok(msg) => {
                        // The daemon never initiates requests; drop anything else.
                        trace!("Ignoring non-response message: {msg:?}");
                    }
                    Err(e) => {
                        let mut pending = pending_clone.lock().await;
                        for (_, tx) in pending.drain() {
                            let _ = tx.send(Err(ClientError::Codec(CodecError::Io(
                                std::io::Error::other(e.to_string()),
                            ))));
                        }
                        break;
                    }
                }
            }

            // Socket closed: fail anything still waiting.
            let mut pending = pending_clone.lock().await;
            for (_, tx) in pending.drain() {
                let _ = tx.send(Err(ClientError::ConnectionClosed));
            }
        });

        Ok(Self {
            sender: Arc::new(Mutex::new(sink)),
            pending,
            next_id: AtomicU64::new(1),
        })
    }

    /// Send an RPC request and wait for a response.
    ///
    /// # Errors
    ///
    /// Returns an error if sending fails, the connection closes, the daemon
    /// reports an error, or deserialization of the result fails.
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst));
        let request = Request::new(method, params, id.clone());

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        let sent = {
            let mut sender = self.sender.lock().await;
            sender.send(Message::Request(request)).await
        };
        if let Err(e) = sent {
            let mut pending = self.pending.lock().await;
            pending.remove(&id);
            return Err(e.into());
        }

        let response = tokio::time::timeout(REQUEST_TIMEOUT, rx)
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|_| ClientError::ConnectionClosed)??;

        if let Some(error) = response.error {
            return Err(error.into());
        }

        let result = response.result.ok_or(ClientError::UnexpectedResponse)?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch the unfiltered bookmark list (capped by the daemon).
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails.
    pub async fn get_bookmarks(&self) -> Result<Vec<BookmarkEntry>, ClientError> {
        let result: BookmarksResult = self.request(METHOD_GET_BOOKMARKS, None).await?;
        Ok(result.bookmarks)
    }

    /// Search the host bookmark store with a free-text query.
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails.
    pub async fn search_bookmarks(
        &self,
        query: impl Into<String>,
    ) -> Result<Vec<BookmarkEntry>, ClientError> {
        let params = SearchBookmarksParams {
            query: query.into(),
        };
        let result: BookmarksResult = self
            .request(METHOD_SEARCH_BOOKMARKS, Some(serde_json::to_value(params)?))
            .await?;
        Ok(result.bookmarks)
    }

    /// Ask the daemon to exit (no response expected).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Codec` if sending fails.
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        let notification = Notification::new(METHOD_SHUTDOWN, None);
        let mut sender = self.sender.lock().await;
        sender.send(Message::Notification(notification)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_path() {
        let path = socket_path();
        assert!(path.ends_with("bmark.sock"));
    }

    #[test]
    fn test_client_error_from_rpc_error() {
        let rpc_err = RpcError::method_not_found("nope");
        let client_err: ClientError = rpc_err.into();

        match client_err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, crate::protocol::METHOD_NOT_FOUND);
                assert!(message.contains("nope"));
            }
            other => panic!("Expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_error_display() {
        assert_eq!(
            ClientError::ConnectionClosed.to_string(),
            "Connection closed"
        );
        assert_eq!(ClientError::Timeout.to_string(), "Request timeout");

        let err = ClientError::Rpc {
            code: crate::protocol::INVALID_PARAMS,
            message: "missing field `query`".to_string(),
        };
        assert!(err.to_string().contains("-32602"));
    }

    #[tokio::test]
    async fn test_connect_to_missing_socket_is_io_error() {
        let result = RpcClient::connect_to(Path::new("/nonexistent/bmark-test.sock")).await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
