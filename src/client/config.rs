//! Proxy configuration

use std::time::Duration;

use url::Url;

use crate::layer::auth::AuthCredentials;

/// Configuration for an [`A2AProxy`](crate::client::A2AProxy)
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Base URL of the remote agent
    pub agent_url: Url,

    /// Per-request timeout, default 30 s
    pub timeout: Duration,

    /// Delay between task polls, default 1 s
    pub poll_interval: Duration,

    /// Hard ceiling on task polls, default 120 (a two-minute wait)
    pub max_poll_attempts: u32,

    /// Credentials attached to every request (if any)
    pub auth: Option<AuthCredentials>,
}

impl ProxyConfig {
    /// Create a configuration with the default timing
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 120,
            auth: None,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delay between task polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the poll ceiling
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Attach credentials to every request
    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }
}
