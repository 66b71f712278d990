//! Messages and their content parts
//!
//! Messages are the unit of communication between agents. Each message has a
//! role, one or more parts (text, file, or data), and optional correlation
//! ids tying it to a task or conversation context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A protocol message carrying one or more content parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique identifier for the message
    #[serde(rename = "messageId")]
    pub message_id: String,

    /// Task this message belongs to, if any
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Which side authored the message
    pub role: Role,

    /// Content parts; a valid message carries at least one
    pub parts: Vec<Part>,

    /// When the message was created
    pub timestamp: DateTime<Utc>,

    /// Optional context identifier for multi-turn conversations
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Free-form metadata attached by the sender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    /// Single-text-part message with a generated id
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::now_v7().to_string(),
            task_id: None,
            role,
            parts: vec![Part::text(text)],
            timestamp: Utc::now(),
            context_id: None,
            metadata: None,
        }
    }

    /// Shorthand for a user-role text message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Shorthand for an agent-role text message
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Start building a message field by field
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Associate the message with a task
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Tie the message to a conversation context
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Insert a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Append a content part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Field-by-field constructor for [`Message`]
#[derive(Debug, Default)]
pub struct MessageBuilder {
    role: Option<Role>,
    parts: Vec<Part>,
    message_id: Option<String>,
    task_id: Option<String>,
    context_id: Option<String>,
    metadata: Option<HashMap<String, Value>>,
}

impl MessageBuilder {
    /// An empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender role (required)
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Replace the parts list wholesale
    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }

    /// Append one part
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Explicit message ID (generated when not set)
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Correlate with a task
    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Correlate with a conversation context
    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    /// Attach a metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Assemble the message
    ///
    /// # Panics
    ///
    /// Panics when no role was set or the parts list is empty
    pub fn build(self) -> Message {
        let role = self.role.expect("Message role is required");
        assert!(
            !self.parts.is_empty(),
            "Message must have at least one part"
        );

        Message {
            message_id: self
                .message_id
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            task_id: self.task_id,
            role,
            parts: self.parts,
            timestamp: Utc::now(),
            context_id: self.context_id,
            metadata: self.metadata,
        }
    }
}

/// Sender side of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the calling side
    User,

    /// Message produced by the agent
    Agent,
}

/// One piece of message content
///
/// Parts carry a `type` discriminant on the wire. Unknown discriminants are
/// rejected at deserialization rather than silently passed through, so every
/// consumer can match exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Plain text
    Text {
        /// The text itself
        text: String,
    },

    /// File reference by URI
    File {
        /// URI locating the file content
        uri: String,

        /// MIME type of the file
        #[serde(rename = "mimeType")]
        mime_type: String,

        /// Display name of the file
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,

        /// Size in bytes, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },

    /// Structured data payload
    Data {
        /// Arbitrary JSON payload
        data: Value,

        /// MIME type of the payload
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,

        /// Producer-defined format hint
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}

impl Part {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// File part referencing content by URI
    pub fn file(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::File {
            uri: uri.into(),
            mime_type: mime_type.into(),
            name: None,
            size: None,
        }
    }

    /// File part with a display name and known size
    pub fn file_named(
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        name: impl Into<String>,
        size: u64,
    ) -> Self {
        Self::File {
            uri: uri.into(),
            mime_type: mime_type.into(),
            name: Some(name.into()),
            size: Some(size),
        }
    }

    /// Data part with no declared MIME type
    pub fn data(data: Value) -> Self {
        Self::Data {
            data,
            mime_type: None,
            format: None,
        }
    }

    /// Data part tagged as `application/json`
    pub fn json_data(data: Value) -> Self {
        Self::Data {
            data,
            mime_type: Some("application/json".to_string()),
            format: None,
        }
    }
}
