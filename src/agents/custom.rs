//! Client-defined assistant agent.

use crate::adapter::{AgentHooks, AgentLike};
use crate::engine::events::TextEvent;
use crate::engine::ClientHandle;
use crate::types::AgentSpec;

/// An assistant whose behavior comes entirely from the spec's system
/// message and description.
pub struct CustomAgent {
    name: String,
    system_message: String,
    description: String,
    client: ClientHandle,
}

impl CustomAgent {
    pub fn from_spec(spec: &AgentSpec, client: ClientHandle) -> Self {
        Self {
            name: spec.name.clone(),
            system_message: spec.system_message.clone(),
            description: spec.description.clone(),
            client,
        }
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

impl AgentLike for CustomAgent {
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
        Some(vec![TextEvent::DEFAULT_KIND.to_string()])
    }

    fn hooks(&self) -> AgentHooks {
        AgentHooks {
            reset: true,
            stream: true,
            single_message: true,
        }
    }
}
