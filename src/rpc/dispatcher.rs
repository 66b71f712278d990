//! Method registry and request dispatch
//!
//! The dispatcher owns no task state. It validates the envelope, looks up the
//! handler, and maps handler errors to wire error objects. Every malformed
//! input becomes a well-formed JSON-RPC error response; nothing here panics
//! on bad input.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::protocol::error::{A2AError, JsonRpcError, INVALID_PARAMS, PARSE_ERROR};

use super::{JsonRpcRequest, JsonRpcResponse};

/// Boxed async method handler
pub type MethodHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, A2AError>> + Send + Sync>;

/// Server-side JSON-RPC dispatcher
#[derive(Clone, Default)]
pub struct RpcDispatcher {
    handlers: HashMap<String, MethodHandler>,
    /// Registration order, reported by `/health`
    method_names: Vec<String>,
    verbose_errors: bool,
}

impl RpcDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach debug detail to error responses
    pub fn with_verbose_errors(mut self) -> Self {
        self.verbose_errors = true;
        self
    }

    /// Register a method handler.
    ///
    /// # Panics
    ///
    /// Panics if the method name is already registered; overwriting a live
    /// handler is a programming error, not a runtime condition.
    pub fn register<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, A2AError>> + Send + Sync + 'static,
    {
        let method = method.into();
        if self.handlers.contains_key(&method) {
            panic!("method already registered: {}", method);
        }
        self.method_names.push(method.clone());
        self.handlers.insert(method, Arc::new(handler));
    }

    /// Registered method names in registration order
    pub fn method_names(&self) -> &[String] {
        &self.method_names
    }

    /// Parse, validate and dispatch a raw request body.
    ///
    /// The request id is echoed back whenever it can be recovered from the
    /// body, even when validation fails later; only an unparseable body
    /// forces a null id.
    pub async fn dispatch(&self, body: &[u8]) -> JsonRpcResponse {
        let raw: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "request body is not valid JSON");
                return JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                );
            }
        };

        let id = recover_id(&raw);

        let Some(obj) = raw.as_object() else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::new(-32600, "Invalid request: body must be a JSON object"),
            );
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::new(-32600, "Invalid request: jsonrpc must be \"2.0\""),
            );
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::new(-32600, "Invalid request: method must be a string"),
            );
        };

        if !id_is_valid(obj.get("id")) {
            return JsonRpcResponse::error(
                Value::Null,
                JsonRpcError::new(
                    -32600,
                    "Invalid request: id must be a string, number or null",
                ),
            );
        }

        let Some(handler) = self.handlers.get(method) else {
            debug!(method, "method not found");
            return JsonRpcResponse::error(
                id,
                JsonRpcError::new(-32601, format!("Method not found: {}", method)),
            );
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);

        match handler(params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                warn!(method, error = %err, "handler returned error");
                JsonRpcResponse::error(id, self.map_error(&err))
            }
        }
    }

    /// Dispatch an already-parsed request envelope, used by in-process
    /// callers that skip the HTTP surface.
    pub async fn dispatch_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let body = match serde_json::to_vec(&request) {
            Ok(body) => body,
            Err(e) => {
                return JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::new(-32603, format!("Internal error: {}", e)),
                )
            }
        };
        self.dispatch(&body).await
    }

    /// Map a handler error to a wire error object.
    ///
    /// Typed errors keep their numeric code. Untyped internal errors whose
    /// message mentions "Invalid param" are treated as params validation
    /// failures, matching how handlers report missing fields.
    fn map_error(&self, err: &A2AError) -> JsonRpcError {
        let mut code = err.code();
        if code == -32603 && err.to_string().contains("Invalid param") {
            code = INVALID_PARAMS;
        }
        let mut wire = JsonRpcError::new(code, err.to_string());
        if self.verbose_errors {
            wire = wire.with_data(serde_json::json!({ "detail": format!("{:?}", err) }));
        }
        wire
    }
}

impl std::fmt::Debug for RpcDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcDispatcher")
            .field("methods", &self.method_names)
            .field("verbose_errors", &self.verbose_errors)
            .finish()
    }
}

/// Pull the id out of the raw request, if it is a legal id value
fn recover_id(raw: &Value) -> Value {
    match raw.get("id") {
        Some(id) if id_is_valid(Some(id)) => id.clone(),
        _ => Value::Null,
    }
}

fn id_is_valid(id: Option<&Value>) -> bool {
    match id {
        None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Number(_)) => true,
        Some(_) => false,
    }
}
