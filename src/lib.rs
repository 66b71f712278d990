//! # A2A Runtime
//!
//! A runtime for the Agent2Agent (A2A) protocol: a JSON-RPC 2.0 server with
//! a task lifecycle engine on one side, and a polling proxy client built on
//! Tower's Service and Layer abstractions on the other.
//!
//! ## Features
//!
//! - **Agent server**: axum HTTP surface exposing `message/send`,
//!   `tasks/get` and `tasks/cancel`, agent card discovery and a health check
//! - **Task lifecycle**: submitted → working → completed/failed/canceled,
//!   with append-only history and cooperative cancellation
//! - **Proxy client**: forwards a JSON payload to a remote agent and polls
//!   the resulting task to completion
//! - **Composable middleware**: auth and validation as Tower layers
//!
//! ## Serving an agent
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use a2a_runtime::prelude::*;
//! use a2a_runtime::server::{A2AServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let card = AgentCard::builder()
//!         .id("echo")
//!         .name("Echo Agent")
//!         .description("Echoes whatever it is sent")
//!         .skill(Skill::new("echo", "Echo", "Repeat the request back"))
//!         .transport(TransportEntry::jsonrpc("http://127.0.0.1:4310"))
//!         .build()?;
//!
//!     let server = A2AServer::new(ServerConfig::default(), card, Arc::new(EchoProcessor));
//!     server.serve().await
//! }
//! ```
//!
//! ## Calling an agent
//!
//! ```rust,no_run
//! use a2a_runtime::client::{A2AProxy, ProxyConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), a2a_runtime::protocol::error::A2AError> {
//! let config = ProxyConfig::new("http://127.0.0.1:4310".parse().unwrap());
//! let mut proxy = A2AProxy::new(config);
//!
//! proxy.init().await?;
//! let result = proxy.handle_request(json!({"question": "weather?"})).await?;
//! println!("agent answered: {}", result);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod layer;
pub mod manager;
pub mod protocol;
pub mod rpc;
pub mod server;
pub mod store;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AProxy, ProxyConfig},
        manager::{JobContext, JobError, JobOutput, TaskManager},
        protocol::error::A2AError,
        protocol::{
            A2AOperation, AgentCard, Artifact, Message, Part, Role, Skill, Task, TaskState,
            TaskStatus, TransportEntry,
        },
        server::{methods::EchoProcessor, A2AServer, MessageProcessor, ServerConfig},
    };
}
