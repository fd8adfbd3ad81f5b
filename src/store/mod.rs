//! Conversation persistence.
//!
//! Two layers of record: individual events appended as the run streams, and
//! one conversation record written when a run reaches its terminal result.
//! Stores are best-effort collaborators; callers log and swallow their
//! failures rather than killing a live stream.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Result, TroupeError};
use crate::normalize::CanonicalEvent;
use crate::types::AgentSpec;

/// Full record of one finished conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationRecord {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    /// Normalized transcript, in stream order.
    pub messages: Vec<CanonicalEvent>,
    /// Roster specs the session was built from.
    pub agents: Vec<AgentSpec>,
    pub run_mode_locally: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        messages: Vec<CanonicalEvent>,
        agents: Vec<AgentSpec>,
        run_mode_locally: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            messages,
            agents,
            run_mode_locally,
            timestamp: Utc::now(),
        }
    }
}

/// Persistence backend for events and conversation records.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append one normalized event to the session's event log.
    async fn append_event(&self, event: &CanonicalEvent) -> Result<()>;

    /// Write the terminal conversation record.
    async fn store_conversation(&self, record: &ConversationRecord) -> Result<()>;

    /// Load a session's event log, in append order.
    async fn load_events(&self, user_id: &str, session_id: &str) -> Result<Vec<CanonicalEvent>>;

    /// Load a finished conversation, if one was recorded.
    async fn load_conversation(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<ConversationRecord>>;
}

/// In-memory store for tests and embedded use.
#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<(String, String), Vec<CanonicalEvent>>>,
    conversations: Mutex<HashMap<(String, String), ConversationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn append_event(&self, event: &CanonicalEvent) -> Result<()> {
        let key = (event.session_user.clone(), event.session_id.clone());
        self.events
            .lock()
            .await
            .entry(key)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn store_conversation(&self, record: &ConversationRecord) -> Result<()> {
        let key = (record.user_id.clone(), record.session_id.clone());
        self.conversations.lock().await.insert(key, record.clone());
        Ok(())
    }

    async fn load_events(&self, user_id: &str, session_id: &str) -> Result<Vec<CanonicalEvent>> {
        let key = (user_id.to_string(), session_id.to_string());
        Ok(self
            .events
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_conversation(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<ConversationRecord>> {
        let key = (user_id.to_string(), session_id.to_string());
        Ok(self.conversations.lock().await.get(&key).cloned())
    }
}

/// File-backed store: one JSON-lines event log per session plus one JSON
/// conversation record, both partitioned by user.
pub struct JsonlStore {
    root: PathBuf,
}

impl JsonlStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn events_path(&self, user_id: &str, session_id: &str) -> PathBuf {
        self.root
            .join("events")
            .join(sanitize(user_id))
            .join(format!("{}.jsonl", sanitize(session_id)))
    }

    fn conversation_path(&self, user_id: &str, session_id: &str) -> PathBuf {
        self.root
            .join("conversations")
            .join(sanitize(user_id))
            .join(format!("{}.json", sanitize(session_id)))
    }
}

/// Identifiers come from clients; keep them from escaping the store root.
fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ConversationStore for JsonlStore {
    async fn append_event(&self, event: &CanonicalEvent) -> Result<()> {
        let path = self.events_path(&event.session_user, &event.session_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn store_conversation(&self, record: &ConversationRecord) -> Result<()> {
        let path = self.conversation_path(&record.user_id, &record.session_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, json).await?;
        Ok(())
    }

    async fn load_events(&self, user_id: &str, session_id: &str) -> Result<Vec<CanonicalEvent>> {
        let path = self.events_path(user_id, session_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut events = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let event: CanonicalEvent = serde_json::from_str(line).map_err(|e| {
                TroupeError::Persistence(format!(
                    "corrupt event log {}: {}",
                    path.display(),
                    e
                ))
            })?;
            events.push(event);
        }
        Ok(events)
    }

    async fn load_conversation(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<ConversationRecord>> {
        let path = self.conversation_path(user_id, session_id);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&contents)?))
    }
}
