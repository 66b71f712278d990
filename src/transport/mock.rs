//! Closure-backed transport for proxy tests

use std::{
    sync::Arc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use url::Url;

use crate::protocol::error::A2AError;
use crate::transport::{Transport, TransportRequest, TransportResponse};

type Handler = Arc<dyn Fn(TransportRequest) -> TransportResponse + Send + Sync>;

/// Transport whose responses come from a caller-supplied closure, so the
/// whole service stack can be exercised without opening a socket.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Handler,
    base_url: Url,
}

impl MockTransport {
    /// Mock answering every request through `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            base_url: Url::parse("http://mock.invalid").unwrap(),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        Ok((self.handler)(request))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
