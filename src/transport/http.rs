//! JSON-over-HTTP transport backed by a pooled reqwest client

use std::task::{Context, Poll};

use async_trait::async_trait;
use url::Url;

use crate::protocol::error::A2AError;

use super::{Transport, TransportRequest, TransportResponse};

/// Carries JSON-RPC payloads over plain HTTP.
///
/// Endpoints are resolved against the configured base URL, so one transport
/// serves both the RPC root and discovery paths such as
/// `/.well-known/agent-card.json`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport with a freshly constructed client
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Build a transport around an existing reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }

    fn resolve(&self, endpoint: &str) -> Result<Url, A2AError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| A2AError::Transport(format!("invalid endpoint {}: {}", endpoint, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // reqwest pools connections internally and never blocks on readiness
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let url = self.resolve(&request.endpoint)?;

        let mut builder = match request.method.as_str() {
            "POST" => self.client.post(url),
            "GET" => self.client.get(url),
            other => {
                return Err(A2AError::Transport(format!(
                    "unsupported HTTP method: {}",
                    other
                )))
            }
        };

        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
