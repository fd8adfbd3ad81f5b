//! Agent specifications: the declarative input to the roster builder.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Declarative description of one agent in a roster. Immutable input record;
/// clients post ordered arrays of these to start a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSpec {
    /// Open string; parsed to [`AgentKind`] at roster-build time.
    #[serde(alias = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub system_message: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl AgentSpec {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            system_message: String::new(),
            description: String::new(),
            index_name: None,
            icon: None,
        }
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Closed set of agent kinds the roster builder can construct.
///
/// Accepts both the current kind strings and the legacy names older clients
/// send (`FileSurfer`, `WebSurfer`, `CustomMCP`, `RAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AgentKind {
    #[strum(to_string = "Coder")]
    Coder,
    #[strum(to_string = "Executor", serialize = "CodeExecutor")]
    CodeExecutor,
    #[strum(to_string = "FileBrowser", serialize = "FileSurfer")]
    FileBrowser,
    #[strum(to_string = "WebBrowser", serialize = "WebSurfer")]
    WebBrowser,
    #[strum(to_string = "Custom")]
    Custom,
    #[strum(to_string = "RemoteTool", serialize = "CustomMCP")]
    RemoteTool,
    #[strum(to_string = "Retrieval", serialize = "RAG")]
    Retrieval,
}

impl AgentKind {
    /// Resolve the kind for a spec.
    ///
    /// Legacy clients send the umbrella kind `"MagenticOne"` and select the
    /// preset role through the agent name; everything else parses the kind
    /// string directly.
    pub fn for_spec(spec: &AgentSpec) -> Option<AgentKind> {
        let key = if spec.kind == "MagenticOne" {
            spec.name.as_str()
        } else {
            spec.kind.as_str()
        };
        key.parse().ok()
    }
}

/// The four preset agents used when a client does not supply a roster.
pub fn default_roster() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new("Coder", "Coder").with_icon("👨‍💻"),
        AgentSpec::new("Executor", "Executor").with_icon("💻"),
        AgentSpec::new("FileSurfer", "FileSurfer").with_icon("📂"),
        AgentSpec::new("WebSurfer", "WebSurfer").with_icon("🏄‍♂️"),
    ]
}

/// Default display icon for an agent name.
pub fn agent_icon(agent_name: &str) -> &'static str {
    match agent_name {
        "Orchestrator" => "🎻",
        "WebSurfer" => "🏄‍♂️",
        "Coder" => "👨‍💻",
        "FileSurfer" => "📂",
        "Executor" => "💻",
        "user" => "👤",
        _ => "🤖",
    }
}

const SESSION_ADJECTIVES: &[&str] = &[
    "quantum", "stellar", "cyber", "astro", "virtual", "cosmic",
];
const SESSION_NOUNS: &[&str] = &[
    "cyborg", "robot", "drone", "galaxy", "probe", "hologram",
];

/// Generate a human-readable session id (`adjective-noun-NNNN`).
pub fn generate_session_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = SESSION_ADJECTIVES[rng.gen_range(0..SESSION_ADJECTIVES.len())];
    let noun = SESSION_NOUNS[rng.gen_range(0..SESSION_NOUNS.len())];
    format!("{}-{}-{}", adjective, noun, rng.gen_range(1000..10000))
}
