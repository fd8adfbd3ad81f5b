//! Code-execution agent.

use std::path::PathBuf;

use crate::adapter::{AgentHooks, AgentLike};
use crate::engine::events::TextEvent;
use crate::error::Result;

/// Where generated code actually runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorBackend {
    /// Remote elastic pool of sandboxes.
    Remote { endpoint: String },
    /// Sandboxed container on this host, writing into `work_dir`.
    LocalContainer { work_dir: PathBuf },
}

/// Runs the code other agents produce. The backend choice is made by the
/// roster builder from configuration; the agent itself is backend-agnostic.
pub struct CodeExecutorAgent {
    name: String,
    backend: ExecutorBackend,
}

impl CodeExecutorAgent {
    /// Build an executor. For the local-container backend the work
    /// directory is created up front so the sandbox has a mount point
    /// before the first run.
    pub async fn new(name: impl Into<String>, backend: ExecutorBackend) -> Result<Self> {
        if let ExecutorBackend::LocalContainer { work_dir } = &backend {
            tokio::fs::create_dir_all(work_dir).await?;
        }
        Ok(Self {
            name: name.into(),
            backend,
        })
    }

    pub fn backend(&self) -> &ExecutorBackend {
        &self.backend
    }
}

impl AgentLike for CodeExecutorAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Executes code blocks proposed by other agents and reports output.")
    }

    fn produced_event_kinds(&self) -> Option<Vec<String>> {
        Some(vec![TextEvent::DEFAULT_KIND.to_string()])
    }

    fn hooks(&self) -> AgentHooks {
        AgentHooks {
            reset: true,
            stream: false,
            single_message: true,
        }
    }
}
