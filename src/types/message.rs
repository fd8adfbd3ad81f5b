//! Message types exchanged with the completion client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message passed to or received from the completion client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: String,
    /// Name of the agent that produced the message, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModelMessage {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
            source: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            source: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create an assistant message attributed to an agent.
    pub fn assistant(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            source: Some(source.into()),
            timestamp: Some(Utc::now()),
        }
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A delta emitted by the completion client's streaming interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageChunk {
    /// The incremental text chunk.
    pub delta: String,
    /// Set on the final chunk.
    #[serde(default)]
    pub done: bool,
}
