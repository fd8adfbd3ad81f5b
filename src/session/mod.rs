//! Session lifecycle.

pub mod registry;

pub use registry::SessionRegistry;

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapter::AdaptedAgent;
use crate::engine::{EngineEventStream, OrchestrationEngine};
use crate::error::{Result, TroupeError};
use crate::roster::RosterBuilder;
use crate::types::AgentSpec;

/// Resource limits for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBudgets {
    /// Maximum orchestration rounds before the engine gives up.
    pub max_rounds: u32,
    /// Wall-clock deadline for the whole run.
    pub max_time: Duration,
    /// Consecutive no-progress rounds tolerated before replanning stops.
    pub max_stalls: u32,
    /// Ask the orchestrator for a final answer when budgets run out.
    pub return_final_answer: bool,
}

impl Default for RunBudgets {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            max_time: Duration::from_secs(25 * 60),
            max_stalls: 5,
            return_final_answer: true,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// One client session: identity, roster, budgets, and a cancellation token
/// shared with the registry.
///
/// State transitions are guarded; calling an operation from the wrong state
/// is an [`TroupeError::InvalidState`] error, not a silent retry.
pub struct Session {
    id: String,
    user_id: String,
    budgets: RunBudgets,
    cancellation: CancellationToken,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    state: SessionState,
    roster: Vec<AdaptedAgent>,
    specs: Vec<AgentSpec>,
}

impl Session {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_budgets(id, user_id, RunBudgets::default())
    }

    pub fn with_budgets(
        id: impl Into<String>,
        user_id: impl Into<String>,
        budgets: RunBudgets,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            budgets,
            cancellation: CancellationToken::new(),
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                roster: Vec::new(),
                specs: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn budgets(&self) -> &RunBudgets {
        &self.budgets
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Roster specs as supplied at initialization.
    pub fn specs(&self) -> Vec<AgentSpec> {
        self.lock().specs.clone()
    }

    /// Build the roster and move to `Ready`.
    ///
    /// A build failure leaves the session `Failed`; it cannot be reused.
    pub async fn initialize(&self, builder: &RosterBuilder, specs: &[AgentSpec]) -> Result<()> {
        {
            let mut inner = self.lock();
            if inner.state != SessionState::Uninitialized {
                return Err(TroupeError::InvalidState(format!(
                    "session '{}' cannot initialize from {:?}",
                    self.id, inner.state
                )));
            }
            inner.state = SessionState::Initializing;
        }

        match builder.build(specs).await {
            Ok(roster) => {
                let mut inner = self.lock();
                inner.roster = roster;
                inner.specs = specs.to_vec();
                inner.state = SessionState::Ready;
                tracing::info!(session = %self.id, agents = specs.len(), "session ready");
                Ok(())
            }
            Err(e) => {
                self.lock().state = SessionState::Failed;
                tracing::error!(session = %self.id, error = %e, "roster build failed");
                Err(e)
            }
        }
    }

    /// Start a run against `engine` and register with the cancellation
    /// registry. Only valid from `Ready`.
    pub async fn start(
        &self,
        engine: &dyn OrchestrationEngine,
        registry: &SessionRegistry,
        task: &str,
    ) -> Result<(EngineEventStream, CancellationToken)> {
        let roster = {
            let mut inner = self.lock();
            if inner.state != SessionState::Ready {
                return Err(TroupeError::InvalidState(format!(
                    "session '{}' cannot start from {:?}",
                    self.id, inner.state
                )));
            }
            inner.state = SessionState::Running;
            inner.roster.clone()
        };

        let token = self.cancellation.clone();
        if let Err(e) = registry.register(&self.id, token.clone()).await {
            // Another run already owns this id; this session never started.
            self.lock().state = SessionState::Ready;
            return Err(e);
        }

        match engine
            .run_stream(task, roster, &self.budgets, token.clone())
            .await
        {
            Ok(stream) => {
                tracing::info!(session = %self.id, "run started");
                Ok((stream, token))
            }
            Err(e) => {
                registry.remove(&self.id).await;
                self.lock().state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Record a terminal state. No-op if already terminal.
    pub fn finish(&self, terminal: SessionState) {
        debug_assert!(terminal.is_terminal());
        let mut inner = self.lock();
        if !inner.state.is_terminal() {
            tracing::info!(session = %self.id, state = ?terminal, "session finished");
            inner.state = terminal;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
