//! JSON-RPC 2.0 envelope types and the server-side dispatcher

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::error::JsonRpcError;

pub mod dispatcher;

pub use dispatcher::RpcDispatcher;

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always `"2.0"`
    pub jsonrpc: String,

    /// Method name, e.g. `message/send`
    pub method: String,

    /// Method params
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request id echoed back in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request with a fresh uuid-v7 id
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params: Some(params),
            id: Some(Value::String(uuid::Uuid::now_v7().to_string())),
        }
    }
}

/// JSON-RPC 2.0 response envelope
///
/// Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always `"2.0"`
    pub jsonrpc: String,

    /// Successful result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Request id, null when the request id was unreadable
    pub id: Value,
}

impl JsonRpcResponse {
    /// Build a success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Build an error response
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}
