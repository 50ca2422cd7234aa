//! Daemon channel capability and failure classification.
//!
//! The messaging surface may simply not exist (daemon not running when the
//! palette starts). Rather than checking at every call site, the channel is
//! an injected handle that is either connected or absent; dispatches through
//! an absent handle short-circuit.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use bmark_rpc::RpcClient;
use bmark_types::BookmarkEntry;

use crate::app::FetchSpec;

/// Completed round trip, delivered back into the event loop.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: bmark_rpc::Result<Vec<BookmarkEntry>>,
}

/// The palette's handle on the daemon.
pub enum Channel {
    Connected(Arc<RpcClient>),
    Unavailable,
}

impl Channel {
    /// Try to reach the daemon once at startup. Failure is not an error: the
    /// palette stays usable for web search with an absent channel.
    pub async fn connect(path: Option<&Path>) -> Self {
        let result = match path {
            Some(p) => RpcClient::connect_to(p).await,
            None => RpcClient::connect().await,
        };

        match result {
            Ok(client) => Self::Connected(Arc::new(client)),
            Err(e) => {
                debug!("Daemon not reachable: {}", e);
                Self::Unavailable
            }
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Spawn the round trip for `spec`, delivering its outcome on `tx`.
    /// Returns false when the channel is absent and nothing was dispatched.
    pub fn dispatch(&self, spec: FetchSpec, tx: &mpsc::UnboundedSender<FetchOutcome>) -> bool {
        let Self::Connected(client) = self else {
            return false;
        };

        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match &spec.query {
                None => client.get_bookmarks().await,
                Some(query) => client.search_bookmarks(query.clone()).await,
            };
            let _ = tx.send(FetchOutcome {
                seq: spec.seq,
                result: result.map_err(Into::into),
            });
        });
        true
    }
}

/// How a channel failure should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The daemon side of the connection went away (restart/teardown race).
    /// Expected and user-actionable: informational, once per open.
    StaleConnection,
    /// Anything else: a warning with full detail.
    Other,
}

/// Closed classification of channel failures by error text. Kept in one place
/// so call sites never pattern-match on message strings themselves.
#[must_use]
pub fn classify_failure(err: &bmark_rpc::Error) -> FailureClass {
    if is_stale_text(&err.to_string()) {
        FailureClass::StaleConnection
    } else {
        FailureClass::Other
    }
}

fn is_stale_text(text: &str) -> bool {
    const STALE_MARKERS: &[&str] = &[
        "context invalidated",
        "connection closed",
        "connection reset",
        "connection refused",
        "broken pipe",
    ];

    let text = text.to_lowercase();
    STALE_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmark_rpc::Error;

    #[test]
    fn test_disconnected_is_stale() {
        assert_eq!(
            classify_failure(&Error::Disconnected),
            FailureClass::StaleConnection
        );
    }

    #[test]
    fn test_broken_pipe_is_stale() {
        let err = Error::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        assert_eq!(classify_failure(&err), FailureClass::StaleConnection);
    }

    #[test]
    fn test_invalidated_message_is_stale() {
        let err = Error::Rpc {
            code: -32000,
            message: "Context invalidated: daemon restarted".to_string(),
        };
        assert_eq!(classify_failure(&err), FailureClass::StaleConnection);
    }

    #[test]
    fn test_timeout_is_other() {
        assert_eq!(classify_failure(&Error::Timeout), FailureClass::Other);
    }

    #[test]
    fn test_rpc_error_is_other() {
        let err = Error::Rpc {
            code: -32602,
            message: "missing field `query`".to_string(),
        };
        assert_eq!(classify_failure(&err), FailureClass::Other);
    }

    #[tokio::test]
    async fn test_unavailable_channel_short_circuits() {
        let channel = Channel::Unavailable;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let dispatched = channel.dispatch(
            FetchSpec {
                seq: 1,
                query: None,
            },
            &tx,
        );

        assert!(!dispatched);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_to_missing_socket_is_unavailable() {
        let channel = Channel::connect(Some(Path::new("/nonexistent/bmark.sock"))).await;
        assert!(!channel.is_available());
    }
}
