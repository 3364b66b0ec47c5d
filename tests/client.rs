use httpmock::prelude::*;
use serde_json::json;

use foundrysync::client::{
    CreateSessionRequest, FoundryClient, FoundryError, HumanApproveRequest, StateTransport,
};
use foundrysync::config::FoundryConfig;
use foundrysync::types::{HumanAction, SessionStatus};

fn client_for(server: &MockServer) -> FoundryClient {
    let config = FoundryConfig::default().with_base_url(server.base_url());
    FoundryClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn test_fetch_state_parses_engine_snapshot() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/sessions/s1/state");
            then.status(200).json_body(json!({
                "session_id": "s1",
                "user_intent": "Draft a sleep hygiene protocol",
                "current_draft": {
                    "id": "d2",
                    "content": "Step 1...",
                    "created_at": "2025-11-02T10:30:00Z",
                    "created_by": "RevisionAgent",
                    "parent_draft_id": "d1",
                    "version_number": 2
                },
                "draft_history": [{
                    "id": "d1",
                    "content": "Step 0...",
                    "created_at": "2025-11-02T10:00:00Z",
                    "created_by": "DraftingAgent",
                    "version_number": 1
                }],
                "reviews": [{
                    "id": "r1",
                    "agent_name": "SafetyGuardian",
                    "target_draft_id": "d2",
                    "summary": "No risk detected",
                    "safety_score": 0.95,
                    "rationale": "Content is safe."
                }],
                "safety_score": 0.95,
                "iteration": 2,
                "max_iterations": 4,
                "status": "AWAITING_HUMAN",
                "approve_after_revision": false,
                "scratchpads": {"notes": {"SafetyGuardian": "ok"}}
            }));
        })
        .await;

    let snapshot = client_for(&server).fetch_state("s1").await.unwrap();
    mock.assert_async().await;

    assert_eq!(snapshot.status, SessionStatus::AwaitingHuman);
    assert_eq!(snapshot.current_draft_content(), "Step 1...");
    assert_eq!(snapshot.draft_history.len(), 1);
    assert_eq!(snapshot.reviews[0].agent_name, "SafetyGuardian");
    assert_eq!(snapshot.reviews[0].empathy_score, None);
    assert_eq!(
        snapshot.scratchpads.notes.get("SafetyGuardian").map(String::as_str),
        Some("ok")
    );
}

#[tokio::test]
async fn test_fetch_state_404_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sessions/ghost/state");
            then.status(404).json_body(json!({"detail": "Session not found"}));
        })
        .await;

    let err = client_for(&server).fetch_state("ghost").await.unwrap_err();
    assert!(matches!(err, FoundryError::NotFound { session_id } if session_id == "ghost"));
}

#[tokio::test]
async fn test_fetch_state_server_error_is_transient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sessions/s1/state");
            then.status(500);
        })
        .await;

    let err = client_for(&server).fetch_state("s1").await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_human_approve_posts_buffer_action_and_comments() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sessions/s1/human_approve")
                .json_body(json!({
                    "new_content": "Step 1 revised",
                    "action": "REQUEST_REVISION",
                    "comments": "tighten step 2"
                }));
            then.status(200)
                .json_body(json!({"status": "REVISING", "session_id": "s1"}));
        })
        .await;

    let ack = client_for(&server)
        .human_approve(
            "s1",
            &HumanApproveRequest {
                new_content: "Step 1 revised".to_string(),
                action: HumanAction::RequestRevision,
                comments: Some("tighten step 2".to_string()),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(ack.status, SessionStatus::Revising);
}

#[tokio::test]
async fn test_human_approve_omits_absent_comments() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sessions/s1/human_approve")
                .json_body(json!({
                    "new_content": "final text",
                    "action": "APPROVE_FINAL"
                }));
            then.status(200)
                .json_body(json!({"status": "APPROVED", "session_id": "s1"}));
        })
        .await;

    client_for(&server)
        .human_approve(
            "s1",
            &HumanApproveRequest {
                new_content: "final text".to_string(),
                action: HumanAction::ApproveFinal,
                comments: None,
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_human_approve_failure_is_dispatch_failed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/sessions/s1/human_approve");
            then.status(500).body("graph resume failed");
        })
        .await;

    let err = client_for(&server)
        .human_approve(
            "s1",
            &HumanApproveRequest {
                new_content: String::new(),
                action: HumanAction::Reject,
                comments: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, FoundryError::DispatchFailed { .. }));
    assert!(err.to_string().contains("graph resume failed"));
}

#[tokio::test]
async fn test_list_and_create_sessions() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sessions");
            then.status(200).json_body(json!([
                {"session_id": "s1", "status": "APPROVED", "created_at": "2025-11-01T09:00:00Z"},
                {"session_id": "s2", "status": "AWAITING_HUMAN", "created_at": null}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sessions")
                .json_body(json!({"user_intent": "New protocol"}));
            then.status(200)
                .json_body(json!({"session_id": "s3", "status": "AWAITING_HUMAN"}));
        })
        .await;

    let client = client_for(&server);

    let sessions = client.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].status, SessionStatus::Approved);
    assert!(sessions[1].created_at.is_none());

    let created = client
        .create_session(&CreateSessionRequest {
            user_intent: "New protocol".to_string(),
            user_context: None,
        })
        .await
        .unwrap();
    assert_eq!(created.session_id, "s3");
}
