//! Roster construction: specs in, adapted agents out.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapter::{adapt_with, AdaptedAgent, AdapterStrategies, AgentLike};
use crate::agents::{
    CodeExecutorAgent, CoderAgent, CustomAgent, ExecutorBackend, FileBrowserAgent,
    RemoteToolAgent, RetrievalAgent, WebBrowserAgent,
};
use crate::config::TroupeConfig;
use crate::discovery::discover_tools;
use crate::engine::ClientHandle;
use crate::error::{Result, TroupeError};
use crate::types::{AgentKind, AgentSpec};

/// Builds the concrete agent roster for one session.
///
/// Construction is fail-fast: the first spec that cannot be built aborts the
/// whole roster, and the output preserves input order one-to-one.
pub struct RosterBuilder {
    client: ClientHandle,
    work_dir: PathBuf,
    config: TroupeConfig,
    strategies: AdapterStrategies,
}

impl RosterBuilder {
    pub fn new(client: ClientHandle, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            work_dir: work_dir.into(),
            config: TroupeConfig::default(),
            strategies: AdapterStrategies::default(),
        }
    }

    pub fn with_config(mut self, config: TroupeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strategies(mut self, strategies: AdapterStrategies) -> Self {
        self.strategies = strategies;
        self
    }

    /// Build and adapt every agent in `specs`, in order.
    pub async fn build(&self, specs: &[AgentSpec]) -> Result<Vec<AdaptedAgent>> {
        let mut roster = Vec::with_capacity(specs.len());
        for spec in specs {
            let agent = self.build_one(spec).await?;
            let adapted = adapt_with(agent, &self.strategies)?;
            tracing::info!(agent = %adapted.name, kind = %spec.kind, "built agent");
            roster.push(adapted);
        }
        Ok(roster)
    }

    async fn build_one(&self, spec: &AgentSpec) -> Result<Arc<dyn AgentLike>> {
        let kind = AgentKind::for_spec(spec).ok_or_else(|| {
            TroupeError::Configuration(format!(
                "unknown agent kind '{}' for agent '{}'",
                spec.kind, spec.name
            ))
        })?;

        let agent: Arc<dyn AgentLike> = match kind {
            AgentKind::Coder => Arc::new(CoderAgent::new(&spec.name, self.client.clone())),
            AgentKind::CodeExecutor => {
                let backend = self.executor_backend();
                Arc::new(CodeExecutorAgent::new(&spec.name, backend).await?)
            }
            AgentKind::FileBrowser => Arc::new(FileBrowserAgent::new(
                &spec.name,
                self.client.clone(),
                &self.work_dir,
            )),
            AgentKind::WebBrowser => {
                // Browser tooling is driven through function calls; assert
                // the capability before the engine inspects the client.
                if self.client.ensure_function_calling() {
                    tracing::debug!(agent = %spec.name, "asserted function calling on client");
                }
                Arc::new(WebBrowserAgent::new(
                    &spec.name,
                    self.client.clone(),
                    &self.config.start_page,
                ))
            }
            AgentKind::Custom => Arc::new(CustomAgent::from_spec(spec, self.client.clone())),
            AgentKind::RemoteTool => {
                let (transport, tools) = discover_tools(&self.config)
                    .await
                    .map_err(|e| TroupeError::agent_init(&spec.name, e.to_string()))?;
                Arc::new(RemoteToolAgent::new(
                    &spec.name,
                    &spec.description,
                    self.client.clone(),
                    tools,
                    transport,
                ))
            }
            AgentKind::Retrieval => {
                self.client.ensure_function_calling();
                let endpoint = self.config.search_endpoint.as_deref().ok_or_else(|| {
                    TroupeError::Configuration(format!(
                        "retrieval agent '{}' requires a search endpoint",
                        spec.name
                    ))
                })?;
                let index_name = spec.index_name.as_deref().ok_or_else(|| {
                    TroupeError::Configuration(format!(
                        "retrieval agent '{}' requires an index name",
                        spec.name
                    ))
                })?;
                Arc::new(RetrievalAgent::new(
                    &spec.name,
                    &spec.description,
                    self.client.clone(),
                    index_name,
                    endpoint,
                ))
            }
        };

        Ok(agent)
    }

    /// Local container when configured to run locally or when no pool
    /// endpoint exists; remote pool otherwise.
    fn executor_backend(&self) -> ExecutorBackend {
        match (&self.config.pool_endpoint, self.config.run_locally) {
            (Some(endpoint), false) => ExecutorBackend::Remote {
                endpoint: endpoint.clone(),
            },
            _ => ExecutorBackend::LocalContainer {
                work_dir: self.work_dir.clone(),
            },
        }
    }
}
