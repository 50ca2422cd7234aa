//! Shared JSON-RPC 2.0 protocol definitions for bmark.
//!
//! This crate provides the protocol types, transport codec, and client helper
//! for communication between the bmark palette and the bmark daemon over a
//! Unix socket.
//!
//! # Example
//!
//! ```no_run
//! use bmark_rpc::RpcClient;
//!
//! # async fn example() -> Result<(), bmark_rpc::ClientError> {
//! let client = RpcClient::connect().await?;
//! let bookmarks = client.search_bookmarks("rust").await?;
//! println!("{} matches", bookmarks.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;

pub use client::{ClientError, RpcClient, socket_path};

pub use error::{Error, Result};

pub use protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_GET_BOOKMARKS,
    METHOD_NOT_FOUND, METHOD_SEARCH_BOOKMARKS, METHOD_SHUTDOWN, Message, Notification,
    PARSE_ERROR, Request, RequestId, Response, RpcError,
};

pub use transport::{CodecError, JsonRpcCodec};

// Re-export commonly used data types from bmark-types
pub use bmark_types::{BookmarkEntry, BookmarksResult, MAX_RESULTS, SearchBookmarksParams};
