//! Socket server implementation for the bmark daemon.
//!
//! Accepts connections from palette clients and answers bookmark queries.
//! Each connection gets its own reader loop and writer task; the daemon
//! itself is stateless across requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, trace, warn};

use bmark_rpc::client::socket_path;
use bmark_rpc::protocol::{METHOD_SHUTDOWN, Message, Response};
use bmark_rpc::transport::JsonRpcCodec;

use crate::error::Result;
use crate::handlers::{HandlerContext, handle_request};
use crate::store::BookmarkSearch;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Run the daemon server until a shutdown notification arrives.
///
/// # Errors
///
/// Returns an error if socket setup fails or another daemon already owns the
/// socket.
pub async fn run(
    custom_socket_path: Option<PathBuf>,
    store: Arc<dyn BookmarkSearch>,
) -> Result<()> {
    let path = custom_socket_path.unwrap_or_else(socket_path);

    cleanup_stale_socket(&path).await?;

    let listener = UnixListener::bind(&path)?;
    info!("Daemon listening on {:?}", path);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let store = store.clone();
                        let shutdown_tx = shutdown_tx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, store, shutdown_tx).await {
                                error!("Connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Accept error: {}", e);
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                info!("Shutdown requested, stopping server");
                break;
            }
        }
    }

    if path.exists()
        && let Err(e) = std::fs::remove_file(&path)
    {
        warn!("Failed to remove socket file {:?}: {}", path, e);
    }

    Ok(())
}

/// Refuse to start if a live daemon already owns the socket; remove a dead one.
async fn cleanup_stale_socket(path: &Path) -> Result<()> {
    if path.exists() {
        if UnixStream::connect(path).await.is_ok() {
            return Err(crate::error::DaemonError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "Another daemon is already running",
            )));
        }
        info!("Removing stale socket at {}", path.display());
        std::fs::remove_file(path)?;
    }
    Ok(())
}

async fn handle_connection(
    stream: UnixStream,
    store: Arc<dyn BookmarkSearch>,
    shutdown_tx: watch::Sender<bool>,
) -> Result<()> {
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::SeqCst);
    debug!("[conn {}] New connection", conn_id);

    let framed = tokio_util::codec::Framed::new(stream, JsonRpcCodec::new());
    let (mut sink, mut stream) = framed.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sink.send(msg).await {
                warn!("[conn {}] Failed to send: {}", conn_id, e);
                break;
            }
        }
    });

    let ctx = HandlerContext { store };

    while let Some(result) = stream.next().await {
        match result {
            Ok(msg) => {
                if let Some(response) = process_message(conn_id, &ctx, msg, &shutdown_tx).await
                    && tx.send(Message::Response(response)).is_err()
                {
                    break;
                }

                if *shutdown_tx.borrow() {
                    break;
                }
            }
            Err(e) => {
                warn!("[conn {}] Read error: {}", conn_id, e);
                break;
            }
        }
    }

    debug!("[conn {}] Connection closed", conn_id);
    send_task.abort();

    Ok(())
}

async fn process_message(
    conn_id: u64,
    ctx: &HandlerContext,
    msg: Message,
    shutdown_tx: &watch::Sender<bool>,
) -> Option<Response> {
    match msg {
        Message::Request(request) if request.id.is_some() => {
            trace!(
                "[conn {}] Request: method={}, id={:?}",
                conn_id, request.method, request.id
            );
            let response = match handle_request(ctx, &request).await {
                Ok(resp) => resp,
                Err(err) => Response::error(
                    request
                        .id
                        .clone()
                        .unwrap_or(bmark_rpc::RequestId::Number(0)),
                    err,
                ),
            };
            Some(response)
        }

        // An id-less Request is functionally a notification.
        Message::Request(request) => {
            handle_notification(conn_id, &request.method, shutdown_tx);
            None
        }

        Message::Notification(notification) => {
            handle_notification(conn_id, &notification.method, shutdown_tx);
            None
        }

        Message::Response(resp) => {
            trace!("[conn {}] Ignoring unexpected response id={}", conn_id, resp.id);
            None
        }
    }
}

fn handle_notification(conn_id: u64, method: &str, shutdown_tx: &watch::Sender<bool>) {
    debug!("[conn {}] Notification: method={}", conn_id, method);
    if method == METHOD_SHUTDOWN {
        let _ = shutdown_tx.send(true);
    } else {
        warn!("[conn {}] Unknown notification: {}", conn_id, method);
    }
}
