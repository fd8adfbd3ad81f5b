//! Shared types: agent specifications and completion-client messages.

pub mod message;
pub mod spec;

pub use message::{MessageChunk, ModelMessage, Role};
pub use spec::{
    agent_icon, default_roster, generate_session_name, AgentKind, AgentSpec,
};
