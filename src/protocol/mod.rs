//! Core A2A protocol types and definitions

pub mod agent;
pub mod artifact;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCard, AgentCardBuilder, Skill, TransportEntry};
pub use artifact::Artifact;
pub use error::{A2AError, A2AResult, JsonRpcError};
pub use message::{Message, Part, Role};
pub use operation::A2AOperation;
pub use task::{Task, TaskState, TaskStatus};
