//! Bmark daemon library providing the bookmark query socket server.
//!
//! The daemon answers two methods over a Unix socket - `get_bookmarks` and
//! `search_bookmarks` - by delegating to a host bookmark store behind the
//! [`BookmarkSearch`] seam.

pub mod error;
pub(crate) mod handlers;
pub mod server;
pub mod store;

pub use error::{DaemonError, Result};
pub use server::run;
pub use store::{BookmarkSearch, ChromiumStore, StaticStore};
