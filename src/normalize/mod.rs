//! Event normalization.
//!
//! Maps every [`EngineEvent`] to exactly one [`CanonicalEvent`] on the wire
//! schema clients consume, persisting as it goes. Normalization is total:
//! unrecognized shapes become an `unknown` event with a placeholder, never a
//! dropped frame.

pub mod canonical;
pub mod image;

pub use canonical::{CanonicalEvent, UNKNOWN_KIND, UNKNOWN_PLACEHOLDER, UNKNOWN_SOURCE};
pub use image::{extract_inline_image, ExtractedImage};

use std::sync::Arc;

use serde_json::Value;

use crate::engine::events::{EngineEvent, MultiModalPart};
use crate::store::{ConversationRecord, ConversationStore};
use crate::types::AgentSpec;

/// Name of the agent whose text output may carry inline images.
pub const EXECUTOR_SOURCE: &str = "Executor";

/// Per-session normalizer. Holds the session identity and persistence
/// handle; the event mapping itself is pure.
pub struct Normalizer {
    session_id: String,
    user_id: String,
    store: Arc<dyn ConversationStore>,
    executor_source: String,
    run_locally: bool,
    roster_specs: Vec<AgentSpec>,
}

impl Normalizer {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            store,
            executor_source: EXECUTOR_SOURCE.to_string(),
            run_locally: false,
            roster_specs: Vec::new(),
        }
    }

    pub fn with_roster(mut self, specs: Vec<AgentSpec>) -> Self {
        self.roster_specs = specs;
        self
    }

    pub fn with_run_locally(mut self, run_locally: bool) -> Self {
        self.run_locally = run_locally;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Normalize one engine event and persist it.
    ///
    /// Persistence failures are logged and swallowed; a slow or broken
    /// store must not kill a live stream.
    pub async fn normalize(&self, event: &EngineEvent) -> CanonicalEvent {
        let canonical = self.map_event(event);

        if let Err(e) = self.store.append_event(&canonical).await {
            tracing::warn!(session = %self.session_id, error = %e, "failed to append event");
        }

        if let EngineEvent::TaskResult(result) = event {
            let messages: Vec<CanonicalEvent> =
                result.messages.iter().map(|m| self.map_event(m)).collect();
            let record = ConversationRecord::new(
                &self.user_id,
                &self.session_id,
                messages,
                self.roster_specs.clone(),
                self.run_locally,
            );
            if let Err(e) = self.store.store_conversation(&record).await {
                tracing::warn!(
                    session = %self.session_id,
                    error = %e,
                    "failed to store conversation record"
                );
            }
        }

        canonical
    }

    /// Pure mapping from engine event to wire event.
    fn map_event(&self, event: &EngineEvent) -> CanonicalEvent {
        let mut out = CanonicalEvent::now(&self.session_id, &self.user_id);

        match event {
            EngineEvent::TaskResult(result) => {
                out.kind = "TaskResult".to_string();
                out.source = "TaskResult".to_string();
                out.stop_reason = result.stop_reason.clone();
                if let Some(last) = result.messages.last() {
                    let mapped = self.map_event(last);
                    out.content = mapped.content;
                    out.content_image = mapped.content_image;
                }
            }
            EngineEvent::MultiModal(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                if let Some(first) = event.parts.first() {
                    out.content = match first {
                        MultiModalPart::Text { text } => Value::String(text.clone()),
                        MultiModalPart::Image { .. } => Value::String(String::new()),
                    };
                }
                out.content_image = event
                    .parts
                    .iter()
                    .find_map(|part| part.data_uri());
            }
            EngineEvent::Text(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                if event.source == self.executor_source {
                    if let Some(found) = extract_inline_image(&event.content) {
                        out.content = Value::String(found.remaining);
                        out.content_image = Some(found.data_uri);
                        return out;
                    }
                }
                out.content = Value::String(event.content.clone());
            }
            EngineEvent::ToolCallExecution(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                if let Some(first) = event.results.first() {
                    out.content = Value::String(first.content.clone());
                }
            }
            EngineEvent::ToolCallRequest(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                if let Some(first) = event.calls.first() {
                    out.content = first.arguments.clone();
                }
            }
            EngineEvent::SelectSpeaker(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                if let Some(first) = event.candidates.first() {
                    out.content = Value::String(first.clone());
                }
            }
            EngineEvent::ToolCallSummary(event) => {
                out.kind = event.kind.clone();
                out.source = event.source.clone();
                out.content = Value::String(event.content.clone());
            }
            EngineEvent::Other(raw) => {
                out.kind = UNKNOWN_KIND.to_string();
                out.source = raw
                    .get("source")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_SOURCE)
                    .to_string();
                out.content = Value::String(UNKNOWN_PLACEHOLDER.to_string());
            }
        }

        out
    }
}
