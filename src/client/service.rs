//! Core proxy service
//!
//! Turns an [`A2AOperation`] into a JSON-RPC envelope, executes it over a
//! [`Transport`], and unwraps the response envelope. A JSON-RPC error object
//! comes back as the typed error matching its code.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use serde_json::Value;
use tower_service::Service;

use crate::{
    client::request::ProxyRequest,
    protocol::error::A2AError,
    rpc::{JsonRpcRequest, JsonRpcResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Tower service executing proxy requests as JSON-RPC calls
pub struct JsonRpcService<T> {
    transport: T,
}

impl<T> JsonRpcService<T>
where
    T: Transport,
{
    /// Create a new service over the given transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Build the transport request carrying the JSON-RPC envelope
    fn build_transport_request(req: &ProxyRequest) -> Result<TransportRequest, A2AError> {
        let envelope = JsonRpcRequest::new(req.operation.method(), req.operation.params());
        let body = serde_json::to_vec(&envelope)?;

        let mut transport_req = TransportRequest::new("/", "POST")
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(auth) = &req.context.auth {
            let (header, value) = auth.to_header();
            transport_req = transport_req.header(header, value);
        }

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        Ok(transport_req.body(Bytes::from(body)))
    }

    /// Unwrap a transport response into the JSON-RPC result
    fn parse_transport_response(
        resp: TransportResponse,
        method: &str,
        url: &url::Url,
    ) -> Result<Value, A2AError> {
        if !resp.is_success() {
            return Err(A2AError::Transport(format!(
                "HTTP {} from POST {} ({})",
                resp.status, url, method
            )));
        }

        let envelope: JsonRpcResponse = serde_json::from_slice(&resp.body)?;
        if let Some(err) = envelope.error {
            return Err(A2AError::from_wire(err.code, err.message));
        }
        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

impl<T> Service<ProxyRequest> for JsonRpcService<T>
where
    T: Transport,
{
    type Response = Value;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: ProxyRequest) -> Self::Future {
        let transport = self.transport.clone();

        Box::pin(async move {
            let method = req.operation.method();
            let transport_req = Self::build_transport_request(&req)?;

            let execute = transport.execute(transport_req);
            let transport_resp = match req.context.timeout {
                Some(timeout) => tokio::time::timeout(timeout, execute)
                    .await
                    .map_err(|_| {
                        A2AError::Timeout(format!(
                            "{} request timed out after {:?}",
                            method, timeout
                        ))
                    })??,
                None => execute.await?,
            };

            Self::parse_transport_response(transport_resp, method, transport.base_url())
        })
    }
}

impl<T> Clone for JsonRpcService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}
