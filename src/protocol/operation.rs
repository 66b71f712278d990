//! Client-side protocol operations

use serde_json::{json, Value};

use super::message::Message;

/// The operations a client can issue against an agent
///
/// Each operation maps to a JSON-RPC method name and a params object; the
/// envelope around them is built by the client service.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message, creating a task or addressing an existing one
    SendMessage {
        /// Message to deliver
        message: Message,

        /// Optional task ID to address
        task_id: Option<String>,
    },

    /// Fetch a task snapshot by ID
    GetTask {
        /// ID of the task to fetch
        task_id: String,
    },

    /// Request cancellation of a task
    CancelTask {
        /// ID of the task to cancel
        task_id: String,

        /// Optional reason recorded on the task
        reason: Option<String>,
    },
}

impl A2AOperation {
    /// The JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage { .. } => "message/send",
            A2AOperation::GetTask { .. } => "tasks/get",
            A2AOperation::CancelTask { .. } => "tasks/cancel",
        }
    }

    /// The params object for this operation
    pub fn params(&self) -> Value {
        match self {
            A2AOperation::SendMessage { message, task_id } => {
                let mut params = json!({ "message": message });
                if let Some(id) = task_id {
                    params["taskId"] = json!(id);
                }
                params
            }
            A2AOperation::GetTask { task_id } => json!({ "taskId": task_id }),
            A2AOperation::CancelTask { task_id, reason } => {
                let mut params = json!({ "taskId": task_id });
                if let Some(reason) = reason {
                    params["reason"] = json!(reason);
                }
                params
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::message::Message;

    use super::*;

    #[test]
    fn test_method_names() {
        let op = A2AOperation::SendMessage {
            message: Message::user("test"),
            task_id: None,
        };
        assert_eq!(op.method(), "message/send");

        let op = A2AOperation::GetTask {
            task_id: "task-123".to_string(),
        };
        assert_eq!(op.method(), "tasks/get");

        let op = A2AOperation::CancelTask {
            task_id: "task-123".to_string(),
            reason: None,
        };
        assert_eq!(op.method(), "tasks/cancel");
    }

    #[test]
    fn test_send_message_params() {
        let op = A2AOperation::SendMessage {
            message: Message::user("hello"),
            task_id: None,
        };
        let params = op.params();
        assert!(params["message"]["parts"].is_array());
        assert!(params.get("taskId").is_none());

        let op = A2AOperation::SendMessage {
            message: Message::user("hello"),
            task_id: Some("task-1".to_string()),
        };
        assert_eq!(op.params()["taskId"], "task-1");
    }

    #[test]
    fn test_cancel_params() {
        let op = A2AOperation::CancelTask {
            task_id: "task-9".to_string(),
            reason: Some("no longer needed".to_string()),
        };
        let params = op.params();
        assert_eq!(params["taskId"], "task-9");
        assert_eq!(params["reason"], "no longer needed");
    }
}
