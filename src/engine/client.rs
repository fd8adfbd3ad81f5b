//! Completion client contract and shared handle.

use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::types::{MessageChunk, ModelMessage};

/// Capability descriptor advertised by a completion client.
///
/// Some agent kinds require capabilities the client's own metadata omits on
/// older backends; the roster builder asserts them once, before any run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCapabilities {
    pub function_calling: bool,
    pub vision: bool,
    pub json_output: bool,
    /// Model family name (e.g. `"gpt-4o"`, `"mistral"`).
    pub family: String,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            function_calling: false,
            vision: false,
            json_output: false,
            family: "unknown".to_string(),
        }
    }
}

/// Contract for the completion-model backend. The reasoning itself is an
/// external collaborator; sessions only need create/stream plus the
/// capability descriptor.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier this client serves.
    fn model_id(&self) -> &str;

    /// Capability descriptor as the backend reports it.
    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities::default()
    }

    /// Generate one message (non-streaming).
    async fn create(&self, messages: &[ModelMessage]) -> Result<ModelMessage>;

    /// Generate a message as a lazy sequence of chunks.
    async fn create_stream(
        &self,
        messages: &[ModelMessage],
    ) -> Result<BoxStream<'static, Result<MessageChunk>>>;
}

/// Shared handle around a completion client.
///
/// Holds the mutable capability descriptor separately from the (read-only)
/// client so roster construction can assert capabilities without the backend
/// cooperating. The descriptor is mutated at most once, before a run starts;
/// it is never touched mid-run.
#[derive(Clone)]
pub struct ClientHandle {
    inner: Arc<dyn CompletionClient>,
    capabilities: Arc<RwLock<ClientCapabilities>>,
}

impl ClientHandle {
    pub fn new(inner: Arc<dyn CompletionClient>) -> Self {
        let capabilities = inner.capabilities();
        Self {
            inner,
            capabilities: Arc::new(RwLock::new(capabilities)),
        }
    }

    pub fn client(&self) -> Arc<dyn CompletionClient> {
        self.inner.clone()
    }

    pub fn model_id(&self) -> String {
        self.inner.model_id().to_string()
    }

    /// Snapshot of the current capability descriptor.
    pub fn capabilities(&self) -> ClientCapabilities {
        let capabilities = match self.capabilities.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        capabilities.clone()
    }

    /// Assert function-calling support if not already present.
    ///
    /// Returns `true` when the descriptor was mutated.
    pub fn ensure_function_calling(&self) -> bool {
        let mut capabilities = match self.capabilities.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if capabilities.function_calling {
            return false;
        }
        capabilities.function_calling = true;
        true
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("model_id", &self.inner.model_id())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct StaticClient;

    #[async_trait]
    impl CompletionClient for StaticClient {
        fn model_id(&self) -> &str {
            "test-model"
        }

        async fn create(&self, _messages: &[ModelMessage]) -> Result<ModelMessage> {
            Ok(ModelMessage::assistant("ok", "model"))
        }

        async fn create_stream(
            &self,
            _messages: &[ModelMessage],
        ) -> Result<BoxStream<'static, Result<MessageChunk>>> {
            let chunks = vec![
                Ok(MessageChunk {
                    delta: "ok".into(),
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

    #[tokio::test]
    async fn ensure_function_calling_mutates_once() {
        let handle = ClientHandle::new(Arc::new(StaticClient));
        assert!(!handle.capabilities().function_calling);

        assert!(handle.ensure_function_calling());
        assert!(handle.capabilities().function_calling);

        // Second call is a no-op.
        assert!(!handle.ensure_function_calling());
    }

    #[tokio::test]
    async fn clones_share_the_descriptor() {
        let handle = ClientHandle::new(Arc::new(StaticClient));
        let clone = handle.clone();

        handle.ensure_function_calling();
        assert!(clone.capabilities().function_calling);
    }

    #[tokio::test]
    async fn create_stream_yields_chunks() {
        let handle = ClientHandle::new(Arc::new(StaticClient));
        let mut stream = handle.client().create_stream(&[]).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.delta, "ok");
    }
}
