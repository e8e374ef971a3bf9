// ABOUTME: Integration tests for the session route handlers
// ABOUTME: Exercises every endpoint through the full middleware stack, including error paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use axum::Router;
use chat_session_api::routes::sessions::{ChatResponse, FeedbackResponse, NewChatResponse};
use common::create_test_app;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

// ============================================================================
// Test Helpers
// ============================================================================

async fn new_chat(app: &Router, uri: &str) -> NewChatResponse {
    AxumTestRequest::get(uri)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json()
}

async fn ask(app: &Router, session_id: &str, question: &str) -> ChatResponse {
    AxumTestRequest::post(&format!("/chat/{session_id}"))
        .json(&json!({ "question": question }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_new_chat_creates_listed_session() {
    let (app, _) = create_test_app();

    let created = new_chat(&app, "/new-chat").await;
    assert!(!created.session_id.is_empty());

    let sessions: Vec<Value> = AxumTestRequest::get("/sessions")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], created.session_id);
    assert_eq!(sessions[0]["messageCount"], 0);
    assert!(sessions[0]["title"].as_str().unwrap().starts_with("Chat - "));
    assert!(sessions[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_new_chat_with_title_query() {
    let (app, resources) = create_test_app();

    let created = new_chat(&app, "/new-chat?title=Budget%20planning").await;

    let session = resources
        .store
        .get_session(&created.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.title, "Budget planning");
}

#[tokio::test]
async fn test_sessions_listed_newest_first() {
    let (app, _) = create_test_app();

    let first = new_chat(&app, "/new-chat").await;
    let second = new_chat(&app, "/api/new-chat").await;

    let sessions: Vec<Value> = AxumTestRequest::get("/api/sessions")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(sessions[0]["id"], second.session_id);
    assert_eq!(sessions[1]["id"], first.session_id);
}

#[tokio::test]
async fn test_get_session_history() {
    let (app, _) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;
    let reply = ask(&app, &created.session_id, "ping").await;

    let history: Vec<Value> = AxumTestRequest::get(&format!("/session/{}", created.session_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(history.len(), 2);

    assert_eq!(history[0]["type"], "user");
    assert_eq!(history[0]["content"], "ping");
    assert!(history[0]["feedback"].is_null());
    assert!(history[0].get("tabularData").is_none());

    assert_eq!(history[1]["type"], "assistant");
    assert_eq!(history[1]["id"], reply.id);
    assert_eq!(history[1]["content"], "pong");
    assert!(history[1]["tabularData"]["headers"].is_array());
    assert!(history[1]["timestamp"].is_string());
}

#[tokio::test]
async fn test_get_unknown_session_returns_404() {
    let (app, _) = create_test_app();

    let body: Value = AxumTestRequest::get("/session/does-not-exist")
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();

    assert_eq!(error_code(&body), "RESOURCE_NOT_FOUND");
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_returns_assistant_reply() {
    let (app, _) = create_test_app();
    let created = new_chat(&app, "/new-chat?title=Numbers").await;

    let response: Value = AxumTestRequest::post(&format!("/api/chat/{}", created.session_id))
        .json(&json!({ "question": "ping" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(response["type"], "assistant");
    assert_eq!(response["content"], "pong");
    assert_eq!(response["newTitle"], "Numbers");
    assert!(response["feedback"].is_null());
    assert!(response["tabularData"]["rows"].is_array());
    assert!(response["id"].is_string());
    assert!(response["timestamp"].is_string());

    let sessions: Vec<Value> = AxumTestRequest::get("/sessions")
        .send(app)
        .await
        .json();
    assert_eq!(sessions[0]["messageCount"], 2);
}

#[tokio::test]
async fn test_chat_rejects_invalid_json() {
    let (app, _) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;

    let body: Value = AxumTestRequest::post(&format!("/chat/{}", created.session_id))
        .raw_json("{not json")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(error_code(&body), "INVALID_FORMAT");
}

#[tokio::test]
async fn test_chat_rejects_missing_question() {
    let (app, resources) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;

    let body: Value = AxumTestRequest::post(&format!("/chat/{}", created.session_id))
        .json(&json!({ "prompt": "ping" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error_code(&body), "MISSING_REQUIRED_FIELD");

    AxumTestRequest::post(&format!("/chat/{}", created.session_id))
        .json(&json!({ "question": "  " }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let session = resources
        .store
        .get_session(&created.session_id)
        .await
        .unwrap()
        .unwrap();
    assert!(session.messages.is_empty());
}

#[tokio::test]
async fn test_chat_unknown_session_returns_400() {
    let (app, resources) = create_test_app();

    let body: Value = AxumTestRequest::post("/chat/does-not-exist")
        .json(&json!({ "question": "ping" }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(error_code(&body), "INVALID_INPUT");
    assert!(resources.store.list_sessions().await.unwrap().is_empty());
}

// ============================================================================
// Feedback
// ============================================================================

#[tokio::test]
async fn test_feedback_on_reply() {
    let (app, resources) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;
    let reply = ask(&app, &created.session_id, "ping").await;

    let response: FeedbackResponse =
        AxumTestRequest::post(&format!("/messages/{}/feedback", reply.id))
            .json(&json!({ "feedback": "like" }))
            .send(app.clone())
            .await
            .assert_status(StatusCode::OK)
            .json();
    assert!(response.success);

    let raw: Value = AxumTestRequest::post(&format!("/api/messages/{}/feedback", reply.id))
        .json(&json!({ "feedback": "dislike" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(raw, json!({ "success": true, "feedback": "dislike" }));

    let history: Vec<Value> = AxumTestRequest::get(&format!("/session/{}", created.session_id))
        .send(app)
        .await
        .json();
    assert_eq!(history[1]["feedback"], "dislike");
    assert!(history[0]["feedback"].is_null());

    let session = resources
        .store
        .get_session(&created.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.messages.len(), 2);
}

#[tokio::test]
async fn test_feedback_validation_errors() {
    let (app, _) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;
    let reply = ask(&app, &created.session_id, "ping").await;
    let uri = format!("/messages/{}/feedback", reply.id);

    let missing: Value = AxumTestRequest::post(&uri)
        .json(&json!({}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error_code(&missing), "MISSING_REQUIRED_FIELD");

    let unrecognized: Value = AxumTestRequest::post(&uri)
        .json(&json!({ "feedback": "love" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error_code(&unrecognized), "INVALID_INPUT");

    AxumTestRequest::post(&uri)
        .raw_json("feedback=like")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_unknown_or_user_message_returns_404() {
    let (app, resources) = create_test_app();
    let created = new_chat(&app, "/new-chat").await;
    ask(&app, &created.session_id, "ping").await;

    AxumTestRequest::post("/messages/does-not-exist/feedback")
        .json(&json!({ "feedback": "like" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let session = resources
        .store
        .get_session(&created.session_id)
        .await
        .unwrap()
        .unwrap();
    let question_id = &session.messages[0].id;

    AxumTestRequest::post(&format!("/messages/{question_id}/feedback"))
        .json(&json!({ "feedback": "like" }))
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// OPTIONS, health and request ids
// ============================================================================

#[tokio::test]
async fn test_options_returns_empty_200_on_any_path() {
    let (app, _) = create_test_app();

    for uri in ["/sessions", "/chat/anything", "/api/messages/x/feedback", "/nowhere"] {
        let body = AxumTestRequest::options(uri)
            .send(app.clone())
            .await
            .assert_status(StatusCode::OK)
            .bytes();
        assert!(body.is_empty(), "OPTIONS {uri} returned a body");
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app();

    let response = AxumTestRequest::options("/chat/abc")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .send(app)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _) = create_test_app();

    AxumTestRequest::get("/nowhere")
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _) = create_test_app();

    let health: Value = AxumTestRequest::get("/health")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(health["status"], "healthy");

    let ready: Value = AxumTestRequest::get("/ready")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["storage"], "in-memory");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let (app, _) = create_test_app();

    let generated = AxumTestRequest::get("/health").send(app.clone()).await;
    assert!(generated.header("x-request-id").is_some());

    let propagated = AxumTestRequest::get("/health")
        .header("x-request-id", "req-123")
        .send(app)
        .await;
    assert_eq!(propagated.header("x-request-id"), Some("req-123"));
}
