//! Wire abstraction for the proxy client
//!
//! The service stack builds [`TransportRequest`] values and hands them to a
//! [`Transport`]; everything above this module is unaware of sockets, which
//! is what lets the proxy tests swap in a closure-backed mock.

pub mod http;
#[cfg(test)]
pub mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::protocol::error::A2AError;

pub use http::HttpTransport;

/// Moves opaque request bytes to the remote agent and brings response
/// bytes back.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Readiness probe, surfaced through Tower's `Service::poll_ready`
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Perform one request/response exchange
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// Base URL this transport talks to
    fn base_url(&self) -> &Url;
}

/// One outgoing exchange, described independently of the wire protocol
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Path relative to the transport's base URL ("/", "/health")
    pub endpoint: String,

    /// Verb for the exchange, HTTP method names by convention
    pub method: String,

    /// Header name/value pairs sent with the request
    pub headers: HashMap<String, String>,

    /// Raw payload
    pub body: Bytes,
}

impl TransportRequest {
    /// Request for the given endpoint and verb, empty-bodied and headerless
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attach one header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the payload
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }
}

/// What came back from the remote side
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code, HTTP semantics
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Raw payload
    pub body: Bytes,
}

impl TransportResponse {
    /// Empty response with the given status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attach one header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the payload
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = TransportRequest::new("/", "POST")
            .header("Content-Type", "application/json")
            .body(Bytes::from_static(b"{}"));

        assert_eq!(req.endpoint, "/");
        assert_eq!(req.method, "POST");
        assert_eq!(
            req.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(&req.body[..], b"{}");
    }

    #[test]
    fn test_response_status_classes() {
        assert!(TransportResponse::new(200).is_success());
        assert!(TransportResponse::new(204).is_success());
        assert!(!TransportResponse::new(404).is_success());
        assert!(!TransportResponse::new(500).is_success());
    }
}
