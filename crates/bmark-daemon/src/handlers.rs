//! Request handlers for the daemon.
//!
//! Both bookmark methods funnel into one fetch path: run the host search
//! primitive on the blocking pool, then apply the service contract
//! (URL-bearing entries only, capped at [`bmark_types::MAX_RESULTS`]).

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use bmark_rpc::protocol::{
    METHOD_GET_BOOKMARKS, METHOD_SEARCH_BOOKMARKS, Request, RequestId, Response, RpcError,
};
use bmark_types::{BookmarksResult, SearchBookmarksParams, cap_results};

use crate::error::{DaemonError, Result};
use crate::store::BookmarkSearch;

pub struct HandlerContext {
    pub store: Arc<dyn BookmarkSearch>,
}

/// Dispatch a request to its handler and wrap the outcome in a response.
///
/// # Errors
///
/// Returns an `RpcError` for unknown methods, bad parameters, or a failed
/// store task; the caller turns it into an error response.
pub async fn handle_request(
    ctx: &HandlerContext,
    request: &Request,
) -> std::result::Result<Response, RpcError> {
    let id = request.id.clone().unwrap_or(RequestId::Number(0));

    let result = match request.method.as_str() {
        METHOD_GET_BOOKMARKS => handle_get_bookmarks(ctx).await,
        METHOD_SEARCH_BOOKMARKS => {
            handle_search_bookmarks(ctx, request.params.as_ref()).await
        }
        other => Err(DaemonError::MethodNotFound(other.to_string())),
    };

    match result {
        Ok(value) => Ok(Response::success(id, value)),
        Err(e) => Err(e.into()),
    }
}

/// Handle `get_bookmarks` - the unfiltered fetch issued when the palette opens.
async fn handle_get_bookmarks(ctx: &HandlerContext) -> Result<Value> {
    debug!("GetBookmarks");
    fetch(ctx, String::new()).await
}

/// Handle `search_bookmarks` - free-text search, one request per keystroke.
async fn handle_search_bookmarks(ctx: &HandlerContext, params: Option<&Value>) -> Result<Value> {
    let params: SearchBookmarksParams = params
        .ok_or_else(|| DaemonError::InvalidParams("Missing params".to_string()))
        .and_then(|v| serde_json::from_value(v.clone()).map_err(DaemonError::Json))?;

    debug!("SearchBookmarks: query='{}'", params.query);
    fetch(ctx, params.query).await
}

/// Run the host primitive off the event loop and apply the service contract.
/// The connection's response path stays open until this completes.
async fn fetch(ctx: &HandlerContext, query: String) -> Result<Value> {
    let store = ctx.store.clone();
    let raw = tokio::task::spawn_blocking(move || store.search(&query))
        .await
        .map_err(|e| DaemonError::StoreTask(e.to_string()))?;

    let result = BookmarksResult {
        bookmarks: cap_results(raw),
    };
    Ok(serde_json::to_value(result)?)
}
