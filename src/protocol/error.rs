//! Error types for A2A protocol operations
//!
//! Errors split into two layers: protocol errors carry the standard JSON-RPC
//! 2.0 codes, domain errors carry A2A-specific codes in the -32000 range.
//! Client-side failure shapes (transport, timeout, remote task) have no wire
//! code of their own and map to [`INTERNAL_ERROR`] when they must cross the
//! wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON parse failure on an incoming request body
pub const PARSE_ERROR: i64 = -32700;
/// Malformed JSON-RPC envelope
pub const INVALID_REQUEST: i64 = -32600;
/// Method is not registered on this agent
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Params failed validation for the target method
pub const INVALID_PARAMS: i64 = -32602;
/// Unclassified handler failure
pub const INTERNAL_ERROR: i64 = -32603;

/// No task with the given id
pub const TASK_NOT_FOUND: i64 = -32001;
/// Cancel requested on an already-canceled task
pub const TASK_ALREADY_CANCELED: i64 = -32002;
/// Cancel requested on a completed or failed task
pub const TASK_NOT_CANCELABLE: i64 = -32003;
/// Agent is at capacity
pub const AGENT_BUSY: i64 = -32004;
/// Message contained parts the agent cannot process
pub const UNSUPPORTED_MESSAGE_FORMAT: i64 = -32005;
/// Credentials missing or rejected
pub const AUTHENTICATION_FAILED: i64 = -32006;
/// Authenticated caller lacks permission
pub const AUTHORIZATION_FAILED: i64 = -32007;

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Request body was not parseable JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Envelope failed JSON-RPC 2.0 validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No handler registered for the requested method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid params for the requested method
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unclassified failure inside a handler
    #[error("Internal error: {0}")]
    Internal(String),

    /// Task lookup failed
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Task is already in the canceled state
    #[error("Task already canceled: {task_id}")]
    TaskAlreadyCanceled { task_id: String },

    /// Task reached completed or failed and cannot be canceled
    #[error("Task not cancelable: {task_id} is {state}")]
    TaskNotCancelable { task_id: String, state: String },

    /// Agent refused the request due to load
    #[error("Agent busy")]
    AgentBusy,

    /// Message parts the agent does not support
    #[error("Unsupported message format: {0}")]
    UnsupportedMessageFormat(String),

    /// Authentication failure
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Authorization failure
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Transport-level error (network, connection, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or poll deadline exceeded
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A remote task ended in failed or canceled
    #[error("Remote task {task_id} ended {state}: {message}")]
    RemoteTask {
        task_id: String,
        state: String,
        message: String,
    },

    /// Validation error (invalid outgoing request or card)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lifecycle transition not permitted by the task state machine
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl A2AError {
    /// The JSON-RPC error code this variant carries on the wire.
    ///
    /// Client-side shapes without a dedicated code collapse to
    /// [`INTERNAL_ERROR`].
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError(_) => PARSE_ERROR,
            A2AError::InvalidRequest(_) => INVALID_REQUEST,
            A2AError::MethodNotFound(_) => METHOD_NOT_FOUND,
            A2AError::InvalidParams(_) => INVALID_PARAMS,
            A2AError::TaskNotFound { .. } => TASK_NOT_FOUND,
            A2AError::TaskAlreadyCanceled { .. } => TASK_ALREADY_CANCELED,
            A2AError::TaskNotCancelable { .. } => TASK_NOT_CANCELABLE,
            A2AError::AgentBusy => AGENT_BUSY,
            A2AError::UnsupportedMessageFormat(_) => UNSUPPORTED_MESSAGE_FORMAT,
            A2AError::AuthenticationFailed(_) => AUTHENTICATION_FAILED,
            A2AError::AuthorizationFailed(_) => AUTHORIZATION_FAILED,
            A2AError::Internal(_)
            | A2AError::Transport(_)
            | A2AError::Timeout(_)
            | A2AError::RemoteTask { .. }
            | A2AError::Validation(_)
            | A2AError::Serialization(_)
            | A2AError::InvalidTransition { .. } => INTERNAL_ERROR,
        }
    }

    /// Rebuild a typed error from a wire error object, preserving the code.
    ///
    /// Codes outside the known set become [`A2AError::Internal`] but the
    /// original code survives through [`JsonRpcError::from`] round-trips via
    /// the message text.
    pub fn from_wire(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            PARSE_ERROR => A2AError::ParseError(message),
            INVALID_REQUEST => A2AError::InvalidRequest(message),
            METHOD_NOT_FOUND => A2AError::MethodNotFound(message),
            INVALID_PARAMS => A2AError::InvalidParams(message),
            TASK_NOT_FOUND => A2AError::TaskNotFound { task_id: message },
            TASK_ALREADY_CANCELED => A2AError::TaskAlreadyCanceled { task_id: message },
            TASK_NOT_CANCELABLE => A2AError::TaskNotCancelable {
                task_id: message,
                state: "terminal".to_string(),
            },
            AGENT_BUSY => A2AError::AgentBusy,
            UNSUPPORTED_MESSAGE_FORMAT => A2AError::UnsupportedMessageFormat(message),
            AUTHENTICATION_FAILED => A2AError::AuthenticationFailed(message),
            AUTHORIZATION_FAILED => A2AError::AuthorizationFailed(message),
            _ => A2AError::Internal(message),
        }
    }
}

/// JSON-RPC 2.0 error object as it appears inside a response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i64,

    /// Human-readable error message
    pub message: String,

    /// Additional error details, attached only in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error object
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach debug detail to the error object
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&A2AError> for JsonRpcError {
    fn from(err: &A2AError) -> Self {
        JsonRpcError::new(err.code(), err.to_string())
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout(err.to_string())
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}
