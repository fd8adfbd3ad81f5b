//! Convenience re-exports for embedding a session pipeline.

pub use crate::adapter::{adapt, AdaptedAgent, AgentLike};
pub use crate::config::TroupeConfig;
pub use crate::engine::{
    ClientCapabilities, ClientHandle, CompletionClient, EngineEvent, EngineEventStream,
    OrchestrationEngine,
};
pub use crate::error::{Result, TroupeError};
pub use crate::normalize::{CanonicalEvent, Normalizer};
pub use crate::roster::RosterBuilder;
pub use crate::session::{RunBudgets, Session, SessionRegistry, SessionState};
pub use crate::store::{ConversationStore, JsonlStore, MemoryStore};
pub use crate::stream::stream_session;
pub use crate::types::{
    default_roster, generate_session_name, AgentKind, AgentSpec, ModelMessage,
};
