//! End-to-end session streaming: engine events in, wire objects out.

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use pretty_assertions::assert_eq;

use common::{echo_client, FailingEngine, ScriptedEngine, StallingEngine};
use troupe::engine::events::TaskResult;
use troupe::engine::{EngineEvent, OrchestrationEngine};
use troupe::normalize::Normalizer;
use troupe::roster::RosterBuilder;
use troupe::session::{RunBudgets, Session, SessionRegistry, SessionState};
use troupe::store::{ConversationStore, MemoryStore};
use troupe::stream::stream_session;
use troupe::types::AgentSpec;

fn poet_spec() -> Vec<AgentSpec> {
    vec![AgentSpec::new("Custom", "Poet").with_system_message("You write verse.")]
}

async fn ready_session(
    id: &str,
    work_dir: &std::path::Path,
    budgets: RunBudgets,
) -> Arc<Session> {
    let session = Arc::new(Session::with_budgets(id, "user-1", budgets));
    let builder = RosterBuilder::new(echo_client(), work_dir);
    session.initialize(&builder, &poet_spec()).await.unwrap();
    session
}

#[tokio::test]
async fn completed_run_yields_one_wire_object_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let session = ready_session("s-complete", dir.path(), RunBudgets::default()).await;
    let store = Arc::new(MemoryStore::new());
    let normalizer = Normalizer::new(session.id(), session.user_id(), store.clone())
        .with_roster(session.specs());
    let registry = SessionRegistry::new();

    let script = vec![
        EngineEvent::text("user", "write a haiku"),
        EngineEvent::text("Poet", "an old silent pond"),
        EngineEvent::TaskResult(TaskResult {
            messages: vec![
                EngineEvent::text("user", "write a haiku"),
                EngineEvent::text("Poet", "an old silent pond"),
            ],
            stop_reason: Some("task completed".to_string()),
        }),
    ];
    let engine: Arc<dyn OrchestrationEngine> = Arc::new(ScriptedEngine::new(script));

    let stream = stream_session(
        session.clone(),
        engine,
        registry.clone(),
        normalizer,
        "write a haiku".to_string(),
    )
    .await
    .unwrap();
    let frames: Vec<_> = stream.collect().await;

    assert_eq!(frames.len(), 3);
    let first = frames[0].as_ref().unwrap();
    assert_eq!(first["type"], "TextMessage");
    assert_eq!(first["source"], "user");
    assert_eq!(first["session_id"], "s-complete");
    assert_eq!(first["session_user"], "user-1");

    let last = frames[2].as_ref().unwrap();
    assert_eq!(last["type"], "TaskResult");
    assert_eq!(last["source"], "TaskResult");
    assert_eq!(last["content"], "an old silent pond");
    assert_eq!(last["stop_reason"], "task completed");

    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(registry.live_count().await, 0);

    // Per-event log plus the terminal conversation record.
    assert_eq!(store.load_events("user-1", "s-complete").await.unwrap().len(), 3);
    let record = store
        .load_conversation("user-1", "s-complete")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.messages.len(), 2);
    assert_eq!(record.agents.len(), 1);
}

#[tokio::test]
async fn cancellation_stops_the_stream_and_marks_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let session = ready_session("s-cancel", dir.path(), RunBudgets::default()).await;
    let store = Arc::new(MemoryStore::new());
    let normalizer = Normalizer::new(session.id(), session.user_id(), store);
    let registry = SessionRegistry::new();

    let script: Vec<_> = (0..20)
        .map(|i| EngineEvent::text("Poet", format!("line {i}")))
        .collect();
    let engine: Arc<dyn OrchestrationEngine> = Arc::new(ScriptedEngine::new(script));

    let mut stream = stream_session(
        session.clone(),
        engine,
        registry.clone(),
        normalizer,
        "recite".to_string(),
    )
    .await
    .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first["content"], "line 0");

    assert!(registry.cancel(session.id()).await);

    let rest: Vec<_> = stream.collect().await;
    // At most one in-flight event after the cancel.
    assert!(rest.len() <= 1, "got {} frames after cancel", rest.len());
    assert_eq!(session.state(), SessionState::Cancelled);
    assert_eq!(registry.live_count().await, 0);
}

#[tokio::test]
async fn engine_error_marks_the_session_failed() {
    let dir = tempfile::tempdir().unwrap();
    let session = ready_session("s-fail", dir.path(), RunBudgets::default()).await;
    let store = Arc::new(MemoryStore::new());
    let normalizer = Normalizer::new(session.id(), session.user_id(), store);
    let registry = SessionRegistry::new();

    let engine: Arc<dyn OrchestrationEngine> = Arc::new(FailingEngine::new(
        vec![EngineEvent::text("Poet", "so far so good")],
        "model backend unreachable",
    ));

    let stream = stream_session(
        session.clone(),
        engine,
        registry.clone(),
        normalizer,
        "recite".to_string(),
    )
    .await
    .unwrap();
    let frames: Vec<_> = stream.collect().await;

    assert_eq!(frames.len(), 2);
    assert!(frames[0].is_ok());
    let err = frames[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("model backend unreachable"));
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(registry.live_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn time_budget_cancels_and_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let budgets = RunBudgets {
        max_time: Duration::from_secs(5),
        ..RunBudgets::default()
    };
    let session = ready_session("s-timeout", dir.path(), budgets).await;
    let store = Arc::new(MemoryStore::new());
    let normalizer = Normalizer::new(session.id(), session.user_id(), store);
    let registry = SessionRegistry::new();

    let engine: Arc<dyn OrchestrationEngine> = Arc::new(StallingEngine);

    let stream = stream_session(
        session.clone(),
        engine,
        registry.clone(),
        normalizer,
        "hang forever".to_string(),
    )
    .await
    .unwrap();
    let frames: Vec<_> = stream.collect().await;

    assert!(frames.is_empty());
    assert_eq!(session.state(), SessionState::Failed);
    assert!(session.cancellation_token().is_cancelled());
    assert_eq!(registry.live_count().await, 0);
}

#[tokio::test]
async fn rejected_duplicate_start_restores_ready() {
    let dir = tempfile::tempdir().unwrap();
    // Two Session instances sharing one id; the registry admits only one.
    let first = ready_session("s-dup", dir.path(), RunBudgets::default()).await;
    let second = ready_session("s-dup", dir.path(), RunBudgets::default()).await;
    let store = Arc::new(MemoryStore::new());
    let registry = SessionRegistry::new();

    let engine: Arc<dyn OrchestrationEngine> =
        Arc::new(ScriptedEngine::new(vec![EngineEvent::text("Poet", "hi")]));

    let stream = stream_session(
        first.clone(),
        engine.clone(),
        registry.clone(),
        Normalizer::new(first.id(), first.user_id(), store.clone()),
        "task".to_string(),
    )
    .await
    .unwrap();

    let rejected = stream_session(
        second.clone(),
        engine,
        registry.clone(),
        Normalizer::new(second.id(), second.user_id(), store),
        "task".to_string(),
    )
    .await;
    assert!(matches!(rejected, Err(troupe::TroupeError::InvalidState(_))));
    // The rejected session never ran; it is still startable.
    assert_eq!(second.state(), SessionState::Ready);

    let frames: Vec<_> = stream.collect().await;
    assert_eq!(frames.len(), 1);
    assert_eq!(first.state(), SessionState::Completed);
}

#[tokio::test]
async fn starting_twice_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let session = ready_session("s-twice", dir.path(), RunBudgets::default()).await;
    let store = Arc::new(MemoryStore::new());
    let registry = SessionRegistry::new();

    let engine: Arc<dyn OrchestrationEngine> =
        Arc::new(ScriptedEngine::new(vec![EngineEvent::text("Poet", "hi")]));

    let stream = stream_session(
        session.clone(),
        engine.clone(),
        registry.clone(),
        Normalizer::new(session.id(), session.user_id(), store.clone()),
        "task".to_string(),
    )
    .await
    .unwrap();

    let second = stream_session(
        session.clone(),
        engine,
        registry.clone(),
        Normalizer::new(session.id(), session.user_id(), store),
        "task".to_string(),
    )
    .await;
    assert!(matches!(second, Err(troupe::TroupeError::InvalidState(_))));

    // The first stream still runs to completion.
    let frames: Vec<_> = stream.collect().await;
    assert_eq!(frames.len(), 1);
    assert_eq!(session.state(), SessionState::Completed);
}
