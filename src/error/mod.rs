//! Error types for Troupe.

use thiserror::Error;

/// Primary error type for all Troupe operations.
#[derive(Error, Debug)]
pub enum TroupeError {
    /// Invalid or missing configuration (unknown agent kind, missing
    /// provider endpoint, unsupported engine version). Raised before a run
    /// starts, never mid-stream.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An agent could not be constructed during roster build.
    #[error("Agent initialization failed: {agent}: {message}")]
    AgentInitialization { agent: String, message: String },

    /// The orchestration engine raised mid-stream; ends the run early.
    #[error("Run error: {0}")]
    Run(String),

    /// A persistence write failed. Logged by callers, never fatal to the
    /// event stream.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TroupeError {
    /// Create an agent initialization error naming the offending agent.
    pub fn agent_init(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AgentInitialization {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised before any run started.
    pub fn is_pre_run(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::AgentInitialization { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TroupeError>;
