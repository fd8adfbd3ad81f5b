//! Engine-agent adaptation.
//!
//! Engine versions disagree on the constructor signature of their agent
//! wrapper: some take named `name`/`key` arguments, some take `id`-shaped
//! values, some are positional. [`adapt`] tries an ordered list of
//! construction strategies and returns the first that succeeds, so a roster
//! built here works across engine versions without version sniffing.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Result, TroupeError};

/// Identity assigned to an adapted agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentId {
    /// Stable identifier, usually the agent name.
    pub id: String,
    /// Unique key distinguishing instances that share a name.
    pub key: String,
}

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.key)
    }
}

/// Lifecycle hooks an underlying agent supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentHooks {
    pub reset: bool,
    pub stream: bool,
    pub single_message: bool,
}

/// An agent implementation as the engine sees it.
pub trait AgentLike: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Event kinds this agent is known to produce, when declared.
    fn produced_event_kinds(&self) -> Option<Vec<String>> {
        None
    }

    fn hooks(&self) -> AgentHooks {
        AgentHooks::default()
    }
}

/// An agent wrapped with engine-facing identity and metadata.
#[derive(Clone)]
pub struct AdaptedAgent {
    pub id: AgentId,
    pub name: String,
    pub description: Option<String>,
    pub produced_event_kinds: Vec<String>,
    pub hooks: AgentHooks,
    inner: Arc<dyn AgentLike>,
}

impl AdaptedAgent {
    pub fn agent(&self) -> Arc<dyn AgentLike> {
        self.inner.clone()
    }
}

impl fmt::Debug for AdaptedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptedAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("produced_event_kinds", &self.produced_event_kinds)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl PartialEq for AdaptedAgent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.produced_event_kinds == other.produced_event_kinds
            && self.hooks == other.hooks
    }
}

/// Either a raw agent awaiting adaptation or an already-adapted one.
///
/// Feeding an adapted agent back through [`adapt`] returns it unchanged, so
/// mixed rosters (some wrapped upstream, some not) adapt cleanly.
#[derive(Clone)]
pub enum AgentValue {
    Raw(Arc<dyn AgentLike>),
    Adapted(AdaptedAgent),
}

impl From<Arc<dyn AgentLike>> for AgentValue {
    fn from(agent: Arc<dyn AgentLike>) -> Self {
        Self::Raw(agent)
    }
}

impl From<AdaptedAgent> for AgentValue {
    fn from(agent: AdaptedAgent) -> Self {
        Self::Adapted(agent)
    }
}

/// One way of constructing the wrapper's identity.
///
/// Strategies return `None` when the construction signature they model is
/// not available, letting [`adapt`] fall through to the next one.
pub trait IdentityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn construct(&self, agent: &Arc<dyn AgentLike>) -> Option<AgentId>;
}

/// Identity from a named `name`/`key` pair (current engine releases).
/// Requires an identifier-shaped name: ASCII alphanumerics, `_` or `-`.
pub struct NamedNameKeyIdentity;

impl IdentityStrategy for NamedNameKeyIdentity {
    fn name(&self) -> &'static str {
        "identity-name-key"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>) -> Option<AgentId> {
        let name = agent.name();
        let identifier_shaped = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !identifier_shaped {
            return None;
        }
        Some(AgentId::new(name))
    }
}

/// Identity from a named `id`/`key` pair (intermediate engine releases).
/// Takes any display name, trimmed of surrounding whitespace.
pub struct NamedIdKeyIdentity;

impl IdentityStrategy for NamedIdKeyIdentity {
    fn name(&self) -> &'static str {
        "identity-id-key"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>) -> Option<AgentId> {
        let id = agent.name().trim();
        if id.is_empty() {
            return None;
        }
        Some(AgentId::new(id))
    }
}

/// Positional identity pair (oldest engine releases). Takes the name
/// verbatim; only an empty name is rejected.
pub struct PositionalIdentity;

impl IdentityStrategy for PositionalIdentity {
    fn name(&self) -> &'static str {
        "identity-positional"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>) -> Option<AgentId> {
        if agent.name().is_empty() {
            return None;
        }
        Some(AgentId::new(agent.name()))
    }
}

/// One way of constructing the engine's agent wrapper around an identity.
pub trait WrapperStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn construct(&self, agent: &Arc<dyn AgentLike>, id: &AgentId) -> Option<AdaptedAgent>;
}

fn build_adapted(agent: &Arc<dyn AgentLike>, id: AgentId) -> AdaptedAgent {
    AdaptedAgent {
        name: agent.name().to_string(),
        description: agent.description().map(str::to_string),
        produced_event_kinds: agent.produced_event_kinds().unwrap_or_default(),
        hooks: agent.hooks(),
        id,
        inner: agent.clone(),
    }
}

/// Named `agent_id`/`agent` constructor (current engine releases).
pub struct NamedAgentIdStrategy;

impl WrapperStrategy for NamedAgentIdStrategy {
    fn name(&self) -> &'static str {
        "named-agent-id"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>, id: &AgentId) -> Option<AdaptedAgent> {
        if id.id.is_empty() || id.key.is_empty() {
            return None;
        }
        Some(build_adapted(agent, id.clone()))
    }
}

/// Named `id`/`agent` constructor (intermediate engine releases).
pub struct NamedIdStrategy;

impl WrapperStrategy for NamedIdStrategy {
    fn name(&self) -> &'static str {
        "named-id"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>, id: &AgentId) -> Option<AdaptedAgent> {
        if id.id.is_empty() {
            return None;
        }
        Some(build_adapted(agent, id.clone()))
    }
}

/// First-two-positional constructor (oldest engine releases).
pub struct PositionalWrapperStrategy;

impl WrapperStrategy for PositionalWrapperStrategy {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn construct(&self, agent: &Arc<dyn AgentLike>, id: &AgentId) -> Option<AdaptedAgent> {
        let mut id = id.clone();
        if id.id.is_empty() {
            id.id = agent.name().to_string();
        }
        if id.id.is_empty() {
            return None;
        }
        Some(build_adapted(agent, id))
    }
}

/// Ordered strategy lists tried by [`adapt`]: identity first, then wrapper.
pub struct AdapterStrategies {
    identity: Vec<Box<dyn IdentityStrategy>>,
    wrapper: Vec<Box<dyn WrapperStrategy>>,
}

impl Default for AdapterStrategies {
    fn default() -> Self {
        Self {
            identity: vec![
                Box::new(NamedNameKeyIdentity),
                Box::new(NamedIdKeyIdentity),
                Box::new(PositionalIdentity),
            ],
            wrapper: vec![
                Box::new(NamedAgentIdStrategy),
                Box::new(NamedIdStrategy),
                Box::new(PositionalWrapperStrategy),
            ],
        }
    }
}

impl AdapterStrategies {
    pub fn new(
        identity: Vec<Box<dyn IdentityStrategy>>,
        wrapper: Vec<Box<dyn WrapperStrategy>>,
    ) -> Self {
        Self { identity, wrapper }
    }
}

/// Adapt one agent with the default strategy order.
pub fn adapt(agent: impl Into<AgentValue>) -> Result<AdaptedAgent> {
    adapt_with(agent, &AdapterStrategies::default())
}

/// Adapt one agent, trying `strategies` in order.
///
/// Already-adapted agents pass through untouched. If no strategy succeeds
/// the engine version is one this build does not support.
pub fn adapt_with(
    agent: impl Into<AgentValue>,
    strategies: &AdapterStrategies,
) -> Result<AdaptedAgent> {
    let raw = match agent.into() {
        AgentValue::Adapted(adapted) => return Ok(adapted),
        AgentValue::Raw(raw) => raw,
    };

    let mut id = None;
    for strategy in &strategies.identity {
        if let Some(constructed) = strategy.construct(&raw) {
            tracing::debug!(agent = raw.name(), strategy = strategy.name(), "identity built");
            id = Some(constructed);
            break;
        }
        tracing::debug!(agent = raw.name(), strategy = strategy.name(), "identity declined");
    }
    let id = id.ok_or_else(|| {
        TroupeError::Configuration(format!(
            "unsupported engine version: no identity strategy accepted agent '{}'",
            raw.name()
        ))
    })?;

    for strategy in &strategies.wrapper {
        if let Some(adapted) = strategy.construct(&raw, &id) {
            tracing::debug!(agent = %adapted.name, strategy = strategy.name(), "adapted agent");
            return Ok(adapted);
        }
        tracing::debug!(agent = raw.name(), strategy = strategy.name(), "strategy declined");
    }

    Err(TroupeError::Configuration(format!(
        "unsupported engine version: no adapter strategy accepted agent '{}'",
        raw.name()
    )))
}
