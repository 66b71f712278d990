//! Task output artifacts and the inline `data:` URI codec
//!
//! Small structured results are carried inline as `data:` URIs rather than
//! hosted at a separate endpoint. The payload after the comma is either
//! base64 (header contains `;base64`) or percent-encoded text.

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::A2AError;

/// An output produced by a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    /// Unique identifier of the artifact
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// MIME type of the artifact content
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Location of the content; inline results use a `data:` URI
    pub uri: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Size in bytes, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// When the artifact was produced
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Artifact {
    /// Create an artifact referencing external content
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            mime_type: mime_type.into(),
            uri: uri.into(),
            description: None,
            size: None,
            created_at: Some(Utc::now()),
        }
    }

    /// Create an artifact holding a JSON value as a base64 `data:` URI
    pub fn inline_json(name: impl Into<String>, value: &Value) -> Result<Self, A2AError> {
        let text = serde_json::to_string(value)?;
        let encoded = general_purpose::STANDARD.encode(text.as_bytes());
        let uri = format!("data:application/json;base64,{}", encoded);
        let mut artifact = Self::new(name, "application/json", uri);
        artifact.size = Some(text.len() as u64);
        Ok(artifact)
    }

    /// Create an artifact holding a JSON value as a percent-encoded `data:` URI
    pub fn inline_json_percent(
        name: impl Into<String>,
        value: &Value,
    ) -> Result<Self, A2AError> {
        let text = serde_json::to_string(value)?;
        let uri = format!(
            "data:application/json,{}",
            urlencoding::encode(&text)
        );
        let mut artifact = Self::new(name, "application/json", uri);
        artifact.size = Some(text.len() as u64);
        Ok(artifact)
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Decode the artifact's `data:` URI payload back into bytes.
    ///
    /// Returns [`A2AError::Validation`] when the URI is not a `data:` URI or
    /// the payload does not decode.
    pub fn decode(&self) -> Result<Vec<u8>, A2AError> {
        decode_data_uri(&self.uri)
    }

    /// Decode the payload and parse it as JSON
    pub fn decode_json(&self) -> Result<Value, A2AError> {
        let bytes = self.decode()?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decode a `data:` URI into the raw payload bytes.
///
/// The URI is split at the first comma; a header containing `base64` selects
/// base64 decoding, anything else is percent-decoded.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, A2AError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| A2AError::Validation(format!("Not a data URI: {}", uri)))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| A2AError::Validation("Data URI missing payload separator".to_string()))?;

    if header.contains("base64") {
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| A2AError::Validation(format!("Invalid base64 payload: {}", e)))
    } else {
        let decoded = urlencoding::decode(payload)
            .map_err(|e| A2AError::Validation(format!("Invalid percent encoding: {}", e)))?;
        Ok(decoded.into_owned().into_bytes())
    }
}
