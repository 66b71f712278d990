//! Credential stamping for outgoing proxy calls
//!
//! The layer writes credentials into the request context; the transport turns
//! them into an HTTP header right before the bytes leave the process.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tower_layer::Layer;
use tower_service::Service;

use crate::{client::request::ProxyRequest, protocol::error::A2AError};

const AUTHORIZATION: &str = "Authorization";

/// Supported credential schemes
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// `Authorization: Bearer <token>`
    Bearer(String),

    /// Opaque key sent in a caller-chosen header
    ApiKey { key: String, header: String },

    /// RFC 7617 basic auth, encoded at send time
    Basic { username: String, password: String },
}

impl AuthCredentials {
    /// Bearer token credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// API key credentials under the given header name
    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            header: header.into(),
        }
    }

    /// Basic auth credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Render the credential as a header name and value pair
    pub fn to_header(&self) -> (String, String) {
        match self {
            Self::Bearer(token) => (AUTHORIZATION.to_string(), format!("Bearer {}", token)),
            Self::ApiKey { key, header } => (header.clone(), key.clone()),
            Self::Basic { username, password } => {
                let pair = format!("{}:{}", username, password);
                (
                    AUTHORIZATION.to_string(),
                    format!("Basic {}", general_purpose::STANDARD.encode(pair)),
                )
            }
        }
    }
}

/// Layer that stamps one set of credentials onto every request context
#[derive(Clone)]
pub struct AuthLayer {
    credentials: AuthCredentials,
}

impl AuthLayer {
    /// Layer applying the given credentials
    pub fn new(credentials: AuthCredentials) -> Self {
        Self { credentials }
    }

    /// Shorthand for a bearer token layer
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(AuthCredentials::bearer(token))
    }

    /// Shorthand for an API key layer
    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(AuthCredentials::api_key(key, header))
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

/// Service produced by [`AuthLayer`].
///
/// Overwrites any credentials already present in the context; the layer owns
/// auth for the whole stack it wraps.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    credentials: AuthCredentials,
}

impl<S> Service<ProxyRequest> for AuthService<S>
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

    fn call(&mut self, mut req: ProxyRequest) -> Self::Future {
        req.context.auth = Some(self.credentials.clone());

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
