// ABOUTME: Test utilities for creating sessions and server resources in a consistent way
// ABOUTME: Centralizes test data creation to avoid duplication across unit and integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::ServerConfig;
use crate::models::{Message, MessageRole, Session, StructuredPayload};
use crate::resources::ServerResources;
use crate::services::{GeneratedReply, ReplyGenerator, SessionStore};
use crate::storage::Storage;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Reply generator returning the same reply for every question
#[derive(Debug, Clone)]
pub struct FixedReplyGenerator {
    /// Reply text
    pub content: String,
    /// Reply payload
    pub payload: Option<StructuredPayload>,
}

impl Default for FixedReplyGenerator {
    fn default() -> Self {
        Self {
            content: "pong".to_owned(),
            payload: Some(sample_table()),
        }
    }
}

impl ReplyGenerator for FixedReplyGenerator {
    fn generate(&self, _question: &str) -> GeneratedReply {
        GeneratedReply {
            content: self.content.clone(),
            payload: self.payload.clone(),
        }
    }
}

/// Small fixed table payload
#[must_use]
pub fn sample_table() -> StructuredPayload {
    json!({
        "headers": ["Region", "Revenue"],
        "rows": [["North", 120.5], ["South", 98.0]],
        "metadata": { "rowCount": 2 }
    })
}

/// Create a detached message with default values
#[must_use]
pub fn create_test_message(role: MessageRole, content: &str) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        role,
        content: content.to_owned(),
        payload: None,
        feedback: None,
        created_at: Utc::now(),
    }
}

/// Create a detached session with default values
#[must_use]
pub fn create_test_session(title: &str) -> Session {
    Session {
        id: Uuid::new_v4().to_string(),
        title: title.to_owned(),
        created_at: Utc::now(),
        messages: Vec::new(),
    }
}

/// In-memory session store
#[must_use]
pub fn create_test_store() -> SessionStore {
    SessionStore::new(Storage::memory())
}

/// Server resources over in-memory storage with a fixed reply generator
#[must_use]
pub fn create_test_resources() -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        create_test_store(),
        Arc::new(FixedReplyGenerator::default()),
        Arc::new(ServerConfig::default()),
    ))
}
