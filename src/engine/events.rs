//! Engine event shapes.
//!
//! The orchestration engine's event vocabulary drifts between releases, so
//! the boundary models it as a closed tagged union: one variant per known
//! upstream shape, plus [`EngineEvent::Other`] for anything unrecognized.
//! Each variant carries the upstream tag string (`kind`) so version-specific
//! names survive normalization unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record emitted by the orchestration engine during a run.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Terminal result carrying the full transcript.
    TaskResult(TaskResult),
    /// Message with text plus an inline image part.
    MultiModal(MultiModalEvent),
    /// Plain text message from one agent.
    Text(TextEvent),
    /// Results of executed tool calls.
    ToolCallExecution(ToolCallExecutionEvent),
    /// Tool calls the model requested but has not executed yet.
    ToolCallRequest(ToolCallRequestEvent),
    /// The orchestrator selected the next speaker.
    SelectSpeaker(SelectSpeakerEvent),
    /// Summary of a completed tool interaction.
    ToolCallSummary(ToolCallSummaryEvent),
    /// Anything this version does not recognize. Never dropped.
    Other(Value),
}

impl EngineEvent {
    /// Convenience constructor for a plain text event with the default tag.
    pub fn text(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text(TextEvent {
            kind: TextEvent::DEFAULT_KIND.to_string(),
            source: source.into(),
            content: content.into(),
        })
    }
}

/// Terminal engine result: the full ordered transcript plus stop reason.
#[derive(Debug, Clone, Default)]
pub struct TaskResult {
    pub messages: Vec<EngineEvent>,
    pub stop_reason: Option<String>,
}

/// Plain text message.
#[derive(Debug, Clone)]
pub struct TextEvent {
    /// Upstream type tag (e.g. `"TextMessage"`).
    pub kind: String,
    pub source: String,
    pub content: String,
}

impl TextEvent {
    pub const DEFAULT_KIND: &'static str = "TextMessage";
}

/// Text plus inline image parts.
#[derive(Debug, Clone)]
pub struct MultiModalEvent {
    pub kind: String,
    pub source: String,
    pub parts: Vec<MultiModalPart>,
}

impl MultiModalEvent {
    pub const DEFAULT_KIND: &'static str = "MultiModalMessage";
}

/// One part of a multi-modal message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MultiModalPart {
    Text { text: String },
    Image { data: String, mime_type: String },
}

impl MultiModalPart {
    pub fn image_png(data: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: "image/png".to_string(),
        }
    }

    /// Data URI for image parts (`data:<mime>;base64,<payload>`).
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Self::Image { data, mime_type } => {
                Some(format!("data:{};base64,{}", mime_type, data))
            }
            Self::Text { .. } => None,
        }
    }
}

/// Executed tool call results.
#[derive(Debug, Clone)]
pub struct ToolCallExecutionEvent {
    pub kind: String,
    pub source: String,
    pub results: Vec<ToolExecutionResult>,
}

impl ToolCallExecutionEvent {
    pub const DEFAULT_KIND: &'static str = "ToolCallExecutionEvent";
}

/// One executed tool call's outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolExecutionResult {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// Requested (not yet executed) tool calls.
#[derive(Debug, Clone)]
pub struct ToolCallRequestEvent {
    pub kind: String,
    pub source: String,
    pub calls: Vec<ToolCall>,
}

impl ToolCallRequestEvent {
    pub const DEFAULT_KIND: &'static str = "ToolCallRequestEvent";
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Speaker selection by the orchestrator.
#[derive(Debug, Clone)]
pub struct SelectSpeakerEvent {
    pub kind: String,
    pub source: String,
    pub candidates: Vec<String>,
}

impl SelectSpeakerEvent {
    pub const DEFAULT_KIND: &'static str = "SelectSpeakerEvent";
}

/// Verbatim tool interaction summary.
#[derive(Debug, Clone)]
pub struct ToolCallSummaryEvent {
    pub kind: String,
    pub source: String,
    pub content: String,
}

impl ToolCallSummaryEvent {
    pub const DEFAULT_KIND: &'static str = "ToolCallSummaryMessage";
}
