//! Orchestration engine boundary.
//!
//! The engine that actually coordinates agents is a pluggable collaborator
//! behind [`OrchestrationEngine`]. Sessions hand it an adapted roster and
//! pull [`EngineEvent`]s from the returned stream; they never observe the
//! engine's internal types.

pub mod client;
pub mod events;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::adapter::AdaptedAgent;
use crate::error::Result;
use crate::session::RunBudgets;

pub use client::{ClientCapabilities, ClientHandle, CompletionClient};
pub use events::{
    EngineEvent, MultiModalEvent, MultiModalPart, SelectSpeakerEvent, TaskResult, TextEvent,
    ToolCall, ToolCallExecutionEvent, ToolCallRequestEvent, ToolCallSummaryEvent,
    ToolExecutionResult,
};

/// Ordered stream of engine events for one run.
pub type EngineEventStream = BoxStream<'static, Result<EngineEvent>>;

/// A multi-agent orchestration backend.
///
/// `run_stream` must observe the cancellation token: once cancelled, the
/// returned stream may emit at most one further event before ending.
#[async_trait]
pub trait OrchestrationEngine: Send + Sync {
    async fn run_stream(
        &self,
        task: &str,
        roster: Vec<AdaptedAgent>,
        budgets: &RunBudgets,
        cancellation: CancellationToken,
    ) -> Result<EngineEventStream>;

    /// Release engine resources. Safe to call more than once.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
