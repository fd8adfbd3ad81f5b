//! Retrieval-augmented agent.

use crate::adapter::{AgentHooks, AgentLike};
use crate::engine::events::{TextEvent, ToolCallSummaryEvent};
use crate::engine::ClientHandle;

/// Answers from a named search index via the search-service endpoint.
pub struct RetrievalAgent {
    name: String,
    description: String,
    client: ClientHandle,
    index_name: String,
    endpoint: String,
}

impl RetrievalAgent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        client: ClientHandle,
        index_name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            client,
            index_name: index_name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

impl AgentLike for RetrievalAgent {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CompletionClient;
    use crate::error::Result;
    use crate::types::{MessageChunk, ModelMessage};
    use async_trait::async_trait;
    use futures::stream::BoxStream;
    use futures::StreamExt;
    use std::sync::Arc;

    struct NullClient;

    #[async_trait]
    impl CompletionClient for NullClient {
        fn model_id(&self) -> &str {
            "null"
        }

        async fn create(&self, _messages: &[ModelMessage]) -> Result<ModelMessage> {
            Ok(ModelMessage::assistant("", "null"))
        }

        async fn create_stream(
            &self,
            _messages: &[ModelMessage],
        ) -> Result<BoxStream<'static, Result<MessageChunk>>> {
            Ok(futures::stream::empty().boxed())
        }
    }

    #[test]
    fn keeps_index_and_endpoint() {
        let agent = RetrievalAgent::new(
            "RAG",
            "Answers from the docs index.",
            ClientHandle::new(Arc::new(NullClient)),
            "docs",
            "https://search.example",
        );
        assert_eq!(agent.index_name(), "docs");
        assert_eq!(agent.endpoint(), "https://search.example");
        assert_eq!(agent.description(), Some("Answers from the docs index."));
    }
}
