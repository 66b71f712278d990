//! Request envelope for the proxy's service stack

use std::{collections::HashMap, time::Duration};

use crate::{layer::auth::AuthCredentials, protocol::operation::A2AOperation};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An operation travelling through the proxy, paired with the settings the
/// layered services read and amend on its way to the wire.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// Operation to run against the remote agent
    pub operation: A2AOperation,

    /// Auth, deadline and header metadata for this call
    pub context: RequestContext,
}

impl ProxyRequest {
    /// Pair an operation with its execution context
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Per-call settings carried alongside the operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Credentials the auth layer stamps onto the outgoing HTTP request
    pub auth: Option<AuthCredentials>,

    /// Deadline for the whole call; `None` disables the timeout wrapper
    pub timeout: Option<Duration>,

    /// Extra headers forwarded verbatim
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Context with the stock 30 second deadline and nothing else set
    pub fn new() -> Self {
        Self {
            auth: None,
            timeout: Some(DEFAULT_TIMEOUT),
            metadata: HashMap::new(),
        }
    }

    /// Attach credentials for the transport to apply
    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Override the call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Forward an extra header with the request
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::Message;

    #[test]
    fn test_request_context_builders() {
        let context = RequestContext::new()
            .with_timeout(Duration::from_secs(60))
            .with_metadata("X-Trace-Id", "abc");

        assert_eq!(context.timeout, Some(Duration::from_secs(60)));
        assert_eq!(context.metadata.get("X-Trace-Id"), Some(&"abc".to_string()));
        assert!(context.auth.is_none());
    }

    #[test]
    fn test_default_context_has_stock_deadline() {
        let context = RequestContext::default();
        assert_eq!(context.timeout, Some(Duration::from_secs(30)));
        assert!(context.metadata.is_empty());
    }

    #[test]
    fn test_request_creation() {
        let operation = A2AOperation::SendMessage {
            message: Message::user("Test"),
            task_id: None,
        };

        let request = ProxyRequest::new(operation, RequestContext::default());
        assert_eq!(request.operation.method(), "message/send");
    }
}
