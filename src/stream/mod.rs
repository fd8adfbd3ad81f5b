//! Client-facing session stream.
//!
//! Glues a running session to its consumer: pulls engine events, normalizes
//! each into one wire object, enforces the wall-clock budget, and settles
//! the session's terminal state when the stream ends.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;

use crate::engine::OrchestrationEngine;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::session::{Session, SessionRegistry, SessionState};

/// Start `task` on `engine` and return the normalized wire stream.
///
/// Exactly one wire object is yielded per engine event. The stream ends
/// when the engine's stream ends, when the run errors, or when the
/// wall-clock budget expires; in every case the session reaches a terminal
/// state and leaves the registry.
pub async fn stream_session(
    session: Arc<Session>,
    engine: Arc<dyn OrchestrationEngine>,
    registry: SessionRegistry,
    normalizer: Normalizer,
    task: String,
) -> Result<BoxStream<'static, Result<Value>>> {
    let (inner, token) = session.start(engine.as_ref(), &registry, &task).await?;
    let deadline = tokio::time::Instant::now() + session.budgets().max_time;
    let session_id = session.id().to_string();

    let stream = async_stream::stream! {
        futures::pin_mut!(inner);
        let mut deadline_hit = false;

        loop {
            let event = if deadline_hit {
                // Budget already expired and the engine was told to stop;
                // drain whatever it still emits.
                inner.next().await
            } else {
                tokio::select! {
                    event = inner.next() => event,
                    _ = tokio::time::sleep_until(deadline) => {
                        tracing::warn!(session = %session_id, "run exceeded time budget");
                        token.cancel();
                        deadline_hit = true;
                        continue;
                    }
                }
            };

            match event {
                Some(Ok(event)) => {
                    let canonical = normalizer.normalize(&event).await;
                    match serde_json::to_value(&canonical) {
                        Ok(value) => yield Ok(value),
                        Err(e) => yield Err(e.into()),
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(session = %session_id, error = %e, "run failed");
                    session.finish(SessionState::Failed);
                    yield Err(e);
                    break;
                }
                None => {
                    let terminal = if deadline_hit {
                        SessionState::Failed
                    } else if token.is_cancelled() {
                        SessionState::Cancelled
                    } else {
                        SessionState::Completed
                    };
                    session.finish(terminal);
                    break;
                }
            }
        }

        registry.remove(&session_id).await;
    };

    Ok(stream.boxed())
}
