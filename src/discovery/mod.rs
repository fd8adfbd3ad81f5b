//! Remote tool discovery.
//!
//! Tools live behind an external registry reachable over one of two
//! transports: a local child process speaking JSON lines over stdio, or a
//! networked server speaking server-sent events. Both expose the same
//! operations through [`ToolTransport`].

use std::process::Stdio;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::config::TroupeConfig;
use crate::error::{Result, TroupeError};

/// How the tool registry is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Child process, JSON lines over stdin/stdout.
    Process,
    /// Networked server, server-sent events plus HTTP POST.
    EventStream,
}

impl FromStr for TransportMode {
    type Err = TroupeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "process" | "stdio" => Ok(Self::Process),
            "eventstream" | "event-stream" | "sse" => Ok(Self::EventStream),
            other => Err(TroupeError::Configuration(format!(
                "unknown tool transport mode '{}'",
                other
            ))),
        }
    }
}

/// Description of one remotely-hosted tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema for the tool's arguments.
    #[serde(default)]
    pub parameters: Value,
}

/// Transport to a tool registry.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value>;
}

/// Discover the tool registry configured in `config` and list its tools.
pub async fn discover_tools(
    config: &TroupeConfig,
) -> Result<(Arc<dyn ToolTransport>, Vec<ToolDescriptor>)> {
    let transport: Arc<dyn ToolTransport> = match config.tool_server_mode {
        TransportMode::Process => {
            let command = config.tool_server_command.as_deref().ok_or_else(|| {
                TroupeError::Configuration(
                    "process tool transport requires a server command".to_string(),
                )
            })?;
            Arc::new(ProcessTransport::spawn(command)?)
        }
        TransportMode::EventStream => {
            let uri = config.tool_server_uri.as_deref().ok_or_else(|| {
                TroupeError::Configuration(
                    "event-stream tool transport requires a server uri".to_string(),
                )
            })?;
            Arc::new(EventStreamTransport::new(
                uri,
                config.tool_server_api_key.clone(),
            ))
        }
    };

    let tools = transport.list_tools().await?;
    tracing::info!(count = tools.len(), "discovered remote tools");
    Ok((transport, tools))
}

/// Child-process transport: one JSON object per line each way.
pub struct ProcessTransport {
    _child: Child,
    stdin: Mutex<ChildStdin>,
    stdout: Mutex<BufReader<ChildStdout>>,
}

impl ProcessTransport {
    /// Spawn the registry process from `command` (program plus arguments).
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            TroupeError::Configuration("empty tool server command".to_string())
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or_else(|| {
            TroupeError::Configuration("tool server process has no stdin".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            TroupeError::Configuration("tool server process has no stdout".to_string())
        })?;

        Ok(Self {
            _child: child,
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(BufReader::new(stdout)),
        })
    }

    async fn request(&self, payload: Value) -> Result<Value> {
        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');

        // Hold both locks across the exchange so concurrent calls cannot
        // interleave their request/response pairs.
        let mut stdin = self.stdin.lock().await;
        let mut stdout = self.stdout.lock().await;

        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;

        let mut response = String::new();
        let read = stdout.read_line(&mut response).await?;
        if read == 0 {
            return Err(TroupeError::Run(
                "tool server process closed its stdout".to_string(),
            ));
        }
        Ok(serde_json::from_str(response.trim())?)
    }
}

#[async_trait]
impl ToolTransport for ProcessTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let response = self.request(json!({ "method": "tools/list" })).await?;
        let tools = response
            .get("tools")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(tools)?)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        self.request(json!({
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments },
        }))
        .await
    }
}

/// Networked transport: SSE for listing, plain POST for calls.
pub struct EventStreamTransport {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl EventStreamTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }
}

#[async_trait]
impl ToolTransport for EventStreamTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let request = self
            .authorize(self.http.get(format!("{}/tools/stream", self.base_url)));
        let mut source = EventSource::new(request)
            .map_err(|e| TroupeError::Run(format!("failed to open tool stream: {e}")))?;

        let mut tools = Vec::new();
        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => {
                    if message.data == "[DONE]" {
                        break;
                    }
                    let descriptor: ToolDescriptor = serde_json::from_str(&message.data)?;
                    tools.push(descriptor);
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(e) => {
                    source.close();
                    return Err(TroupeError::Run(format!("tool stream failed: {e}")));
                }
            }
        }
        source.close();
        Ok(tools)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        let response = self
            .authorize(self.http.post(format!("{}/tools/call", self.base_url)))
            .json(&json!({ "name": name, "arguments": arguments }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
