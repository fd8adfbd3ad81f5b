//! Live-session registry for out-of-band cancellation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TroupeError};

/// Maps live session ids to their cancellation tokens so a control surface
/// can stop a run it did not start.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session's token. Registering an id that is already live
    /// is a logic error upstream.
    pub async fn register(&self, session_id: &str, token: CancellationToken) -> Result<()> {
        let mut sessions = self.inner.lock().await;
        if sessions.contains_key(session_id) {
            return Err(TroupeError::InvalidState(format!(
                "session '{}' is already running",
                session_id
            )));
        }
        sessions.insert(session_id.to_string(), token);
        Ok(())
    }

    /// Cancel a live session. Returns `false` when the id is unknown, which
    /// includes sessions already cancelled and removed.
    pub async fn cancel(&self, session_id: &str) -> bool {
        let token = self.inner.lock().await.remove(session_id);
        match token {
            Some(token) => {
                tracing::info!(session = session_id, "cancelling session");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop a finished session without cancelling it.
    pub async fn remove(&self, session_id: &str) {
        self.inner.lock().await.remove(session_id);
    }

    pub async fn live_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}
