// ABOUTME: Session route handlers for chat session management
// ABOUTME: REST endpoints for listing, creating and reading sessions, chatting and rating replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session routes
//!
//! Thin handlers: decode the request, call the [`SessionStore`], and render
//! the camelCase wire format. Bodies are read as raw bytes so malformed JSON
//! maps to a 400 with the crate's error envelope instead of axum's rejection.
//!
//! [`SessionStore`]: crate::services::SessionStore

use crate::{
    errors::{AppError, AppResult},
    models::{Feedback, Message, MessageRole, MessageView, SessionSummary, StructuredPayload},
    resources::ServerResources,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chat_core::constants::routes;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for creating a session
#[derive(Debug, Default, Deserialize)]
pub struct NewChatQuery {
    /// Optional title; blank falls back to the generated default
    pub title: Option<String>,
}

/// Response for a newly created session
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatResponse {
    /// Session id
    pub session_id: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Body of a chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Question text
    pub question: Option<String>,
}

/// Assistant reply returned by the chat endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Message id
    pub id: String,
    /// Always `assistant`
    #[serde(rename = "type")]
    pub kind: MessageRole,
    /// Reply text
    pub content: String,
    /// Structured payload, `null` when absent
    pub tabular_data: Option<StructuredPayload>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Rating, `null` for a fresh reply
    pub feedback: Option<Feedback>,
    /// Current session title
    pub new_title: String,
}

impl ChatResponse {
    fn new(message: Message, title: String) -> Self {
        Self {
            id: message.id,
            kind: message.role,
            content: message.content,
            tabular_data: message.payload,
            timestamp: message.created_at,
            feedback: message.feedback,
            new_title: title,
        }
    }
}

/// Body of a feedback request
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// `like` or `dislike`
    pub feedback: Option<String>,
}

/// Response after recording feedback
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Always `true`
    pub success: bool,
    /// Recorded value
    pub feedback: Feedback,
}

// ============================================================================
// Routes
// ============================================================================

/// Session routes handler
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(routes::SESSIONS, get(Self::list_sessions))
            .route(routes::NEW_CHAT, get(Self::new_chat))
            .route(routes::SESSION, get(Self::get_session))
            .route(routes::CHAT, post(Self::chat))
            .route(routes::MESSAGE_FEEDBACK, post(Self::set_feedback))
            .with_state(resources)
    }

    /// List all sessions, newest first
    async fn list_sessions(
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<Vec<SessionSummary>>> {
        let sessions = resources.store.list_sessions().await?;
        Ok(Json(sessions))
    }

    /// Create a session
    async fn new_chat(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<NewChatQuery>,
    ) -> AppResult<Json<NewChatResponse>> {
        let session = resources
            .store
            .create_session(query.title.as_deref())
            .await?;

        Ok(Json(NewChatResponse {
            session_id: session.id,
            created_at: session.created_at,
        }))
    }

    /// Message history of a session
    async fn get_session(
        State(resources): State<Arc<ServerResources>>,
        Path(session_id): Path<String>,
    ) -> AppResult<Json<Vec<MessageView>>> {
        let session = resources
            .store
            .get_session(&session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id}")))?;

        Ok(Json(session.messages.iter().map(MessageView::from).collect()))
    }

    /// Record the question, generate a reply and return it
    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        Path(session_id): Path<String>,
        body: Bytes,
    ) -> AppResult<Json<ChatResponse>> {
        let request: ChatRequest = parse_json_body(&body)?;
        let question = request
            .question
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("question"))?;

        let Some(session) = resources.store.get_session(&session_id).await? else {
            return Err(invalid_session(&session_id));
        };

        let assistant = resources
            .store
            .record_exchange(&session_id, &question, resources.reply_generator.as_ref())
            .await?
            .ok_or_else(|| invalid_session(&session_id))?;

        Ok(Json(ChatResponse::new(assistant, session.title)))
    }

    /// Rate an assistant message
    async fn set_feedback(
        State(resources): State<Arc<ServerResources>>,
        Path(message_id): Path<String>,
        body: Bytes,
    ) -> AppResult<Json<FeedbackResponse>> {
        let request: FeedbackRequest = parse_json_body(&body)?;
        let raw = request
            .feedback
            .ok_or_else(|| AppError::missing_field("feedback"))?;
        let feedback: Feedback = raw.parse().map_err(|_| {
            AppError::invalid_input(format!(
                "Invalid feedback value '{raw}', expected 'like' or 'dislike'"
            ))
        })?;

        if !resources.store.set_feedback(&message_id, feedback).await? {
            return Err(AppError::not_found(format!("Message {message_id}")));
        }

        Ok(Json(FeedbackResponse {
            success: true,
            feedback,
        }))
    }
}

/// Decode a JSON body, mapping decode failures to 400
fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejected request body");
        AppError::invalid_format(format!("Invalid JSON body: {e}"))
    })
}

fn invalid_session(session_id: &str) -> AppError {
    warn!(session.id = %session_id, "Chat request for unknown session");
    AppError::invalid_input(format!("Invalid session: {session_id}"))
}
