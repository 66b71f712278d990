//! Validation layer for outgoing proxy requests
//!
//! Rejects malformed operations before they reach the wire, so obvious
//! mistakes fail locally instead of as remote -32602 responses.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use serde_json::Value;
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    client::request::ProxyRequest,
    protocol::{error::A2AError, message::Part, operation::A2AOperation},
};

/// Layer that validates proxy requests before dispatch
#[derive(Clone, Debug, Default)]
pub struct ValidationLayer;

impl ValidationLayer {
    /// Layer rejecting malformed operations before dispatch
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ValidationLayer {
    type Service = ValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidationService { inner }
    }
}

/// Service produced by [`ValidationLayer`]
#[derive(Clone)]
pub struct ValidationService<S> {
    inner: S,
}

impl<S> ValidationService<S> {
    fn validate_request(req: &ProxyRequest) -> Result<(), A2AError> {
        match &req.operation {
            A2AOperation::SendMessage { message, .. } => {
                if message.parts.is_empty() {
                    return Err(A2AError::Validation(
                        "Message must have at least one part".into(),
                    ));
                }

                for part in &message.parts {
                    match part {
                        Part::Text { text } => {
                            if text.is_empty() {
                                return Err(A2AError::Validation(
                                    "Text part cannot be empty".into(),
                                ));
                            }
                        }
                        Part::File { uri, mime_type, .. } => {
                            if uri.is_empty() {
                                return Err(A2AError::Validation(
                                    "File part must have a URI".into(),
                                ));
                            }
                            if mime_type.is_empty() {
                                return Err(A2AError::Validation(
                                    "File part must have a MIME type".into(),
                                ));
                            }
                        }
                        Part::Data { .. } => {}
                    }
                }
            }
            A2AOperation::GetTask { task_id } => {
                if task_id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::CancelTask { task_id, .. } => {
                if task_id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
        }

        Ok(())
    }
}

impl<S> Service<ProxyRequest> for ValidationService<S>
where
    S: Service<ProxyRequest, Response = Value, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Value;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: ProxyRequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
