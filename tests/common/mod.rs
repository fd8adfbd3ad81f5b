//! Shared test doubles: a scripted engine and an echo completion client.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use troupe::adapter::AdaptedAgent;
use troupe::engine::{
    ClientCapabilities, CompletionClient, EngineEvent, EngineEventStream, OrchestrationEngine,
};
use troupe::error::{Result, TroupeError};
use troupe::session::RunBudgets;
use troupe::types::{MessageChunk, ModelMessage};

/// Engine that replays a fixed script of events, honoring cancellation
/// between events.
pub struct ScriptedEngine {
    script: Vec<EngineEvent>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<EngineEvent>) -> Self {
        Self { script }
    }
}

#[async_trait]
impl OrchestrationEngine for ScriptedEngine {
    async fn run_stream(
        &self,
        _task: &str,
        _roster: Vec<AdaptedAgent>,
        _budgets: &RunBudgets,
        cancellation: CancellationToken,
    ) -> Result<EngineEventStream> {
        let script = self.script.clone();
        let stream = async_stream::stream! {
            for event in script {
                if cancellation.is_cancelled() {
                    break;
                }
                yield Ok(event);
                // Let the consumer (and any cancel call) run between events.
                tokio::task::yield_now().await;
            }
        };
        Ok(stream.boxed())
    }
}

/// Engine that yields the given events and then fails.
pub struct FailingEngine {
    prefix: Vec<EngineEvent>,
    message: String,
}

impl FailingEngine {
    pub fn new(prefix: Vec<EngineEvent>, message: impl Into<String>) -> Self {
        Self {
            prefix,
            message: message.into(),
        }
    }
}

#[async_trait]
impl OrchestrationEngine for FailingEngine {
    async fn run_stream(
        &self,
        _task: &str,
        _roster: Vec<AdaptedAgent>,
        _budgets: &RunBudgets,
        _cancellation: CancellationToken,
    ) -> Result<EngineEventStream> {
        let prefix = self.prefix.clone();
        let message = self.message.clone();
        let stream = async_stream::stream! {
            for event in prefix {
                yield Ok(event);
            }
            yield Err(TroupeError::Run(message));
        };
        Ok(stream.boxed())
    }
}

/// Engine that emits nothing until cancelled, then ends. Used to exercise
/// the wall-clock budget.
pub struct StallingEngine;

#[async_trait]
impl OrchestrationEngine for StallingEngine {
    async fn run_stream(
        &self,
        _task: &str,
        _roster: Vec<AdaptedAgent>,
        _budgets: &RunBudgets,
        cancellation: CancellationToken,
    ) -> Result<EngineEventStream> {
        let stream = async_stream::stream! {
            cancellation.cancelled().await;
            // Nothing to emit; a real engine may flush one last event here.
            if false {
                yield Ok(EngineEvent::text("", ""));
            }
        };
        Ok(stream.boxed())
    }
}

/// Completion client that echoes the last message back.
pub struct EchoClient;

#[async_trait]
impl CompletionClient for EchoClient {
    fn model_id(&self) -> &str {
        "echo"
    }

    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities {
            function_calling: false,
            vision: false,
            json_output: false,
            family: "echo".to_string(),
        }
    }

    async fn create(&self, messages: &[ModelMessage]) -> Result<ModelMessage> {
        let content = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(ModelMessage::assistant(content, "echo"))
    }

    async fn create_stream(
        &self,
        messages: &[ModelMessage],
    ) -> Result<BoxStream<'static, Result<MessageChunk>>> {
        let content = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let chunks = vec![
            Ok(MessageChunk {
                delta: content,
                done: false,
            }),
            Ok(MessageChunk {
                delta: String::new(),
                done: true,
            }),
        ];
        Ok(futures::stream::iter(chunks).boxed())
    }
}

pub fn echo_client() -> troupe::engine::ClientHandle {
    troupe::engine::ClientHandle::new(Arc::new(EchoClient))
}
