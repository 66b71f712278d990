//! A2A task types and lifecycle management
//!
//! Tasks are the durable handle for long-running work. The lifecycle is
//! submitted -> working -> completed/failed/canceled, with failure and
//! cancellation accepted from any non-terminal state. Every transition
//! appends a status snapshot to the task history; the last history entry is
//! always the current status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{artifact::Artifact, error::A2AError, message::Message};

/// Task lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Task accepted, work not yet started
    Submitted,

    /// Task is being processed
    Working,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,

    /// Task was canceled before completion
    Canceled,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    /// Check whether a direct transition to `next` is legal.
    ///
    /// Failure and cancellation are reachable from any non-terminal state;
    /// completion requires the task to have started working first.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            TaskState::Submitted => false,
            TaskState::Working => matches!(self, TaskState::Submitted),
            TaskState::Completed => matches!(self, TaskState::Working),
            TaskState::Failed | TaskState::Canceled => true,
        }
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time snapshot of a task's state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// State at the time of the snapshot
    pub state: TaskState,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Optional message attached to the transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    /// Create a status snapshot stamped with the current time
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        Self {
            state,
            timestamp: Utc::now(),
            message,
        }
    }
}

/// A task in the A2A protocol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Optional context ID for grouping related tasks/messages
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Append-only record of every status the task has held
    pub history: Vec<TaskStatus>,

    /// Outputs produced by the task
    pub artifacts: Vec<Artifact>,

    /// Optional metadata for the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Task {
    /// Create a new task in the submitted state
    pub fn new(id: impl Into<String>, initial_message: Message) -> Self {
        let status = TaskStatus::new(TaskState::Submitted, Some(initial_message));
        Self {
            id: id.into(),
            context_id: None,
            status: status.clone(),
            history: vec![status],
            artifacts: Vec::new(),
            metadata: None,
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Check if the task is still processing
    pub fn is_processing(&self) -> bool {
        matches!(
            self.status.state,
            TaskState::Submitted | TaskState::Working
        )
    }

    /// Transition the task to a new state, appending to history.
    ///
    /// Returns [`A2AError::InvalidTransition`] when the edge is not in the
    /// lifecycle graph; terminal states never transition.
    pub fn transition(
        &mut self,
        next: TaskState,
        message: Option<Message>,
    ) -> Result<(), A2AError> {
        if !self.status.state.can_transition_to(next) {
            return Err(A2AError::InvalidTransition {
                from: self.status.state.to_string(),
                to: next.to_string(),
            });
        }
        let status = TaskStatus::new(next, message);
        self.status = status.clone();
        self.history.push(status);
        Ok(())
    }

    /// Record a progress note without changing state.
    ///
    /// Only meaningful while working; the snapshot keeps the current state.
    pub fn record_progress(&mut self, message: Message) {
        let status = TaskStatus::new(self.status.state, Some(message));
        self.status = status.clone();
        self.history.push(status);
    }

    /// Attach an artifact to the task
    pub fn push_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Set the context ID
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Set the task metadata
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Params for `message/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageParams {
    /// The message to deliver
    pub message: Message,

    /// Existing task to address instead of creating a new one
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Params for `tasks/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskParams {
    /// The task ID to retrieve
    #[serde(rename = "taskId")]
    pub task_id: String,
}

/// Params for `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTaskParams {
    /// The task ID to cancel
    #[serde(rename = "taskId")]
    pub task_id: String,

    /// Optional human-readable reason recorded on the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
