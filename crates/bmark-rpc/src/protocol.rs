//! JSON-RPC 2.0 protocol types.
//!
//! This module provides the message types exchanged between the bmark palette
//! and the bmark daemon, plus the method names and error codes of the wire
//! protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Fetch the unfiltered bookmark list (capped, URL-bearing entries only).
pub const METHOD_GET_BOOKMARKS: &str = "get_bookmarks";
/// Free-text search over the host bookmark store.
pub const METHOD_SEARCH_BOOKMARKS: &str = "search_bookmarks";
/// Notification asking the daemon to exit.
pub const METHOD_SHUTDOWN: &str = "shutdown";

/// JSON-RPC 2.0 Request ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: RequestId,
}

impl Response {
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    #[must_use]
    pub fn error(id: RequestId, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 Notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 Error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    #[must_use]
    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    #[must_use]
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {}", method.into()),
        )
    }

    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Incoming message that could be a request, response, or notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Request(Request),
    Response(Response),
    Notification(Notification),
}

impl Message {
    /// True for a request that expects a response (carries an id).
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(r) if r.id.is_some())
    }

    /// True for fire-and-forget messages. An id-less `Request` is
    /// functionally a notification and treated as one.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        matches!(self, Message::Request(r) if r.id.is_none())
            || matches!(self, Message::Notification(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_with_version_and_id() {
        let req = Request::new(
            METHOD_SEARCH_BOOKMARKS,
            Some(serde_json::json!({"query": "rust"})),
            7.into(),
        );
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["jsonrpc"], JSONRPC_VERSION);
        assert_eq!(json["method"], "search_bookmarks");
        assert_eq!(json["params"]["query"], "rust");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_get_bookmarks_request_omits_params() {
        let req = Request::new(METHOD_GET_BOOKMARKS, None, 1.into());
        let json = serde_json::to_string(&req).unwrap();

        assert!(!json.contains("params"));
    }

    #[test]
    fn test_response_success_roundtrip() {
        let resp = Response::success(3.into(), serde_json::json!({"bookmarks": []}));
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();

        let Message::Response(back) = parsed else {
            panic!("Expected Response, got {parsed:?}");
        };
        assert_eq!(back.id, RequestId::Number(3));
        assert!(back.result.is_some());
        assert!(back.error.is_none());
    }

    #[test]
    fn test_response_error_carries_code() {
        let resp = Response::error(9.into(), RpcError::method_not_found("bogus"));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["error"]["code"], METHOD_NOT_FOUND);
        assert!(
            json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("bogus")
        );
    }

    #[test]
    fn test_notification_has_no_id() {
        let notif = Notification::new(METHOD_SHUTDOWN, None);
        let json = serde_json::to_string(&notif).unwrap();

        assert!(!json.contains("\"id\""));
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_notification());
        assert!(!parsed.is_request());
    }

    #[test]
    fn test_idless_request_is_notification() {
        // Some peers send notifications in Request shape with no id.
        let parsed: Message =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"shutdown"}"#).unwrap();
        assert!(parsed.is_notification());
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::Number(12).to_string(), "12");
        assert_eq!(RequestId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_rpc_error_display() {
        let err = RpcError::invalid_params("missing field `query`");
        let text = err.to_string();
        assert!(text.contains("-32602"));
        assert!(text.contains("missing field `query`"));
    }
}
