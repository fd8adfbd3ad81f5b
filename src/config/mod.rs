//! Configuration (layered: code > env).

use std::path::PathBuf;

use crate::discovery::TransportMode;

/// Configuration for session setup: executor and search endpoints, tool
/// discovery transport, and where the event logs live.
#[derive(Debug, Clone)]
pub struct TroupeConfig {
    /// Remote elastic code-execution endpoint. When set, the code-executor
    /// agent prefers it over the local sandboxed container.
    pub pool_endpoint: Option<String>,
    /// Search-service endpoint for retrieval agents.
    pub search_endpoint: Option<String>,
    /// Transport used to discover remote tools.
    pub tool_server_mode: TransportMode,
    /// Base URL of the networked tool registry (event-stream transport).
    pub tool_server_uri: Option<String>,
    /// API key forwarded to the networked tool registry, when required.
    pub tool_server_api_key: Option<String>,
    /// Command (plus arguments) for the local-process tool registry.
    pub tool_server_command: Option<Vec<String>>,
    /// Directory for event logs and conversation records.
    pub logs_dir: PathBuf,
    /// Run the code executor locally rather than against the pool endpoint.
    pub run_locally: bool,
    /// Start page handed to the web-browser agent.
    pub start_page: String,
}

impl Default for TroupeConfig {
    fn default() -> Self {
        Self {
            pool_endpoint: None,
            search_endpoint: None,
            tool_server_mode: TransportMode::EventStream,
            tool_server_uri: None,
            tool_server_api_key: None,
            tool_server_command: None,
            logs_dir: default_logs_dir(),
            run_locally: false,
            start_page: "https://www.bing.com".to_string(),
        }
    }
}

impl TroupeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::new();

        if let Ok(endpoint) = std::env::var("POOL_MANAGEMENT_ENDPOINT") {
            config.pool_endpoint = Some(endpoint);
        }
        if let Ok(endpoint) = std::env::var("SEARCH_SERVICE_ENDPOINT") {
            config.search_endpoint = Some(endpoint);
        }
        if let Ok(mode) = std::env::var("TOOL_SERVER_MODE") {
            if let Ok(mode) = mode.parse() {
                config.tool_server_mode = mode;
            }
        }
        if let Ok(uri) = std::env::var("TOOL_SERVER_URI") {
            config.tool_server_uri = Some(uri);
        }
        if let Ok(key) = std::env::var("TOOL_SERVER_API_KEY") {
            config.tool_server_api_key = Some(key);
        }
        if let Ok(command) = std::env::var("TOOL_SERVER_COMMAND") {
            let parts: Vec<String> = command.split_whitespace().map(String::from).collect();
            if !parts.is_empty() {
                config.tool_server_command = Some(parts);
            }
        }
        if let Ok(dir) = std::env::var("LOGS_DIR") {
            config.logs_dir = PathBuf::from(dir);
        }
        if let Ok(run_locally) = std::env::var("RUN_LOCALLY") {
            config.run_locally = matches!(run_locally.as_str(), "1" | "true" | "yes");
        }
        if let Ok(page) = std::env::var("START_PAGE") {
            config.start_page = page;
        }

        config
    }

    pub fn with_pool_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.pool_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_tool_server(mut self, mode: TransportMode, uri: impl Into<String>) -> Self {
        self.tool_server_mode = mode;
        self.tool_server_uri = Some(uri.into());
        self
    }

    pub fn with_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = dir.into();
        self
    }

    pub fn with_run_locally(mut self, run_locally: bool) -> Self {
        self.run_locally = run_locally;
        self
    }
}

/// Default log directory: platform data dir, falling back to `./logs`.
fn default_logs_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "troupe", "troupe")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}
