//! Canonical wire event.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag used when the engine event shape is unrecognized.
pub const UNKNOWN_KIND: &str = "unknown";

/// Content placeholder for unrecognized events.
pub const UNKNOWN_PLACEHOLDER: &str = "Agents mumbling.";

/// Source used when an event does not attribute itself to an agent.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One normalized event as clients receive it. Every engine event maps to
/// exactly one of these; no input shape is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalEvent {
    /// Wall-clock timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    pub session_id: String,
    pub session_user: String,
    /// Upstream event type tag, or [`UNKNOWN_KIND`].
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl CanonicalEvent {
    /// Shell with the current time and session identity; the normalizer
    /// fills in the event-specific fields.
    pub fn now(session_id: &str, session_user: &str) -> Self {
        Self {
            time: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            session_id: session_id.to_string(),
            session_user: session_user.to_string(),
            kind: UNKNOWN_KIND.to_string(),
            source: UNKNOWN_SOURCE.to_string(),
            content: Value::Null,
            content_image: None,
            stop_reason: None,
        }
    }
}
