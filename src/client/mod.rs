//! Proxy client for remote A2A agents

pub mod config;
pub mod proxy;
pub mod request;
pub mod service;

pub use config::ProxyConfig;
pub use proxy::A2AProxy;
pub use request::{ProxyRequest, RequestContext};
pub use service::JsonRpcService;
