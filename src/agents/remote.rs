//! Agent backed by remotely-discovered tools.

use std::sync::Arc;

use serde_json::Value;

use crate::adapter::{AgentHooks, AgentLike};
use crate::discovery::{ToolDescriptor, ToolTransport};
use crate::engine::events::{
    TextEvent, ToolCallExecutionEvent, ToolCallRequestEvent, ToolCallSummaryEvent,
};
use crate::engine::ClientHandle;
use crate::error::Result;

/// An assistant whose tools live behind a remote registry. The tool list is
/// captured at roster-build time; calls go through the discovery transport.
pub struct RemoteToolAgent {
    name: String,
    description: String,
    client: ClientHandle,
    tools: Vec<ToolDescriptor>,
    transport: Arc<dyn ToolTransport>,
}

impl RemoteToolAgent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        client: ClientHandle,
        tools: Vec<ToolDescriptor>,
        transport: Arc<dyn ToolTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            client,
            tools,
            transport,
        }
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }

    /// Invoke one of the discovered tools by name.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        tracing::debug!(agent = %self.name, tool = name, "calling remote tool");
        self.transport.call_tool(name, arguments).await
    }
}

impl AgentLike for RemoteToolAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        if self.description.is_empty() {
            None
        } else {
            Some(&self.description)
        }
    }

    fn produced_event_kinds(&self) -> Option<Vec<String>> {
        Some(vec![
            TextEvent::DEFAULT_KIND.to_string(),
            ToolCallRequestEvent::DEFAULT_KIND.to_string(),
            ToolCallExecutionEvent::DEFAULT_KIND.to_string(),
            ToolCallSummaryEvent::DEFAULT_KIND.to_string(),
        ])
    }

    fn hooks(&self) -> AgentHooks {
        AgentHooks {
            reset: true,
            stream: false,
            single_message: true,
        }
    }
}
