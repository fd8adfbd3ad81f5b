//! Preset agents: coder, file browser, web browser.

use crate::adapter::{AgentHooks, AgentLike};
use crate::engine::events::{MultiModalEvent, TextEvent};
use crate::engine::ClientHandle;

/// Writes code for the executor to run. Pure completion-client work, no
/// side channel of its own.
pub struct CoderAgent {
    name: String,
    client: ClientHandle,
}

impl CoderAgent {
    pub fn new(name: impl Into<String>, client: ClientHandle) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

impl AgentLike for CoderAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Writes and revises code to make progress on the task.")
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

/// Browses files rooted under the session work directory.
pub struct FileBrowserAgent {
    name: String,
    client: ClientHandle,
    root: std::path::PathBuf,
}

impl FileBrowserAgent {
    /// Files are served from `<work_dir>/data`; nothing above it is visible.
    pub fn new(
        name: impl Into<String>,
        client: ClientHandle,
        work_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            root: work_dir.into().join("data"),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

impl AgentLike for FileBrowserAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Reads and navigates files placed in the session data directory.")
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

/// Drives a browser, emitting screenshots as multi-modal events.
pub struct WebBrowserAgent {
    name: String,
    client: ClientHandle,
    start_page: String,
}

impl WebBrowserAgent {
    pub fn new(
        name: impl Into<String>,
        client: ClientHandle,
        start_page: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            start_page: start_page.into(),
        }
    }

    pub fn start_page(&self) -> &str {
        &self.start_page
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

impl AgentLike for WebBrowserAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Navigates the web starting from the configured start page.")
    }

    fn produced_event_kinds(&self) -> Option<Vec<String>> {
        Some(vec![
            TextEvent::DEFAULT_KIND.to_string(),
            MultiModalEvent::DEFAULT_KIND.to_string(),
        ])
    }

    fn hooks(&self) -> AgentHooks {
        AgentHooks {
            reset: true,
            stream: false,
            single_message: false,
        }
    }
}
