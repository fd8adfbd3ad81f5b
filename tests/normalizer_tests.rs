//! Normalization against the file-backed store.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use troupe::engine::events::{
    EngineEvent, MultiModalEvent, MultiModalPart, SelectSpeakerEvent, TaskResult, TextEvent,
    ToolCallExecutionEvent, ToolCallRequestEvent, ToolCallSummaryEvent, ToolCall,
    ToolExecutionResult,
};
use troupe::normalize::{Normalizer, UNKNOWN_KIND, UNKNOWN_PLACEHOLDER};
use troupe::store::{ConversationStore, JsonlStore};
use troupe::types::AgentSpec;

fn every_event_shape() -> Vec<EngineEvent> {
    vec![
        EngineEvent::text("Coder", "writing code"),
        EngineEvent::MultiModal(MultiModalEvent {
            kind: MultiModalEvent::DEFAULT_KIND.to_string(),
            source: "WebSurfer".to_string(),
            parts: vec![
                MultiModalPart::Text {
                    text: "page loaded".to_string(),
                },
                MultiModalPart::image_png("BBBB"),
            ],
        }),
        EngineEvent::ToolCallRequest(ToolCallRequestEvent {
            kind: ToolCallRequestEvent::DEFAULT_KIND.to_string(),
            source: "Tools".to_string(),
            calls: vec![ToolCall {
                id: "1".to_string(),
                name: "search".to_string(),
                arguments: json!({"q": "rust"}),
            }],
        }),
        EngineEvent::ToolCallExecution(ToolCallExecutionEvent {
            kind: ToolCallExecutionEvent::DEFAULT_KIND.to_string(),
            source: "Tools".to_string(),
            results: vec![ToolExecutionResult {
                name: "search".to_string(),
                content: "3 hits".to_string(),
                is_error: false,
            }],
        }),
        EngineEvent::SelectSpeaker(SelectSpeakerEvent {
            kind: SelectSpeakerEvent::DEFAULT_KIND.to_string(),
            source: "Orchestrator".to_string(),
            candidates: vec!["Coder".to_string()],
        }),
        EngineEvent::ToolCallSummary(ToolCallSummaryEvent {
            kind: ToolCallSummaryEvent::DEFAULT_KIND.to_string(),
            source: "Tools".to_string(),
            content: "searched the web".to_string(),
        }),
        EngineEvent::Other(json!({"surprise": true})),
    ]
}

#[tokio::test]
async fn every_shape_produces_exactly_one_logged_event() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonlStore::new(dir.path()));
    let normalizer = Normalizer::new("s-total", "user-1", store.clone());

    let shapes = every_event_shape();
    for event in &shapes {
        let out = normalizer.normalize(event).await;
        assert_eq!(out.session_id, "s-total");
        assert_eq!(out.session_user, "user-1");
        assert!(!out.kind.is_empty());
    }

    let logged = store.load_events("user-1", "s-total").await.unwrap();
    assert_eq!(logged.len(), shapes.len());
    assert_eq!(logged.last().unwrap().kind, UNKNOWN_KIND);
    assert_eq!(logged.last().unwrap().content, UNKNOWN_PLACEHOLDER);
}

#[tokio::test]
async fn executor_image_survives_the_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonlStore::new(dir.path()));
    let normalizer = Normalizer::new("s-image", "user-1", store.clone());

    let event = EngineEvent::Text(TextEvent {
        kind: TextEvent::DEFAULT_KIND.to_string(),
        source: "Executor".to_string(),
        content: "plot saved {'type': 'image', 'format': 'png', 'base64_data': 'AAAA'} done"
            .to_string(),
    });
    let out = normalizer.normalize(&event).await;
    assert_eq!(
        out.content_image.as_deref(),
        Some("data:image/png;base64,AAAA")
    );
    assert_eq!(out.content, "plot saved  done");

    let logged = store.load_events("user-1", "s-image").await.unwrap();
    assert_eq!(logged[0], out);
}

#[tokio::test]
async fn terminal_result_writes_the_conversation_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonlStore::new(dir.path()));
    let specs = vec![AgentSpec::new("Coder", "Coder"), AgentSpec::new("Executor", "Executor")];
    let normalizer = Normalizer::new("s-done", "user-1", store.clone())
        .with_roster(specs.clone())
        .with_run_locally(true);

    let transcript = vec![
        EngineEvent::text("user", "plot the data"),
        EngineEvent::text("Coder", "here is the script"),
        EngineEvent::text("Executor", "ran it"),
    ];
    let result = EngineEvent::TaskResult(TaskResult {
        messages: transcript,
        stop_reason: Some("task completed".to_string()),
    });

    let out = normalizer.normalize(&result).await;
    assert_eq!(out.kind, "TaskResult");
    assert_eq!(out.content, "ran it");

    let record = store
        .load_conversation("user-1", "s-done")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.messages.len(), 3);
    assert_eq!(record.agents, specs);
    assert!(record.run_mode_locally);
    assert_eq!(record.messages[1].content, Value::String("here is the script".into()));
}
