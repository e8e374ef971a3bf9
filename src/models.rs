// ABOUTME: Domain models for chat sessions, messages and feedback
// ABOUTME: Defines stored records and the camelCase wire views served by the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! A [`Session`] owns an append-only, chronologically ordered list of
//! [`Message`]s. Messages carry an optional structured payload (opaque JSON
//! produced by the reply generator) and, for assistant replies, an optional
//! [`Feedback`] rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque structured document attached to a message (e.g. a table)
pub type StructuredPayload = serde_json::Value;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Question typed by the user
    User,
    /// Generated reply
    Assistant,
}

impl MessageRole {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating attached to an assistant message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Thumbs up
    Like,
    /// Thumbs down
    Dislike,
}

impl Feedback {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a feedback string is not `like` or `dislike`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized feedback value: {0}")]
pub struct ParseFeedbackError(pub String);

impl FromStr for Feedback {
    type Err = ParseFeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(ParseFeedbackError(other.to_owned())),
        }
    }
}

/// One turn in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Globally unique message id
    pub id: String,
    /// Author
    pub role: MessageRole,
    /// Text content
    pub content: String,
    /// Optional structured document (tabular data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<StructuredPayload>,
    /// Rating, only ever set on assistant messages
    #[serde(default)]
    pub feedback: Option<Feedback>,
    /// When the message was appended
    pub created_at: DateTime<Utc>,
}

/// A conversation thread: metadata plus its ordered messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session id
    pub id: String,
    /// Title fixed at creation
    pub title: String,
    /// Creation time, immutable
    pub created_at: DateTime<Utc>,
    /// Append-only message sequence in chronological order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Summary used by session listings
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            message_count: self.messages.len(),
        }
    }

    /// Find a message of this session by id
    #[must_use]
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }
}

/// Listing entry for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session id
    pub id: String,
    /// Session title
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Number of messages in the session
    pub message_count: usize,
}

/// Message as rendered in a session history response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message id
    pub id: String,
    /// Author role (`user` or `assistant`)
    #[serde(rename = "type")]
    pub kind: MessageRole,
    /// Text content
    pub content: String,
    /// Structured payload, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabular_data: Option<StructuredPayload>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Rating, `null` until set
    pub feedback: Option<Feedback>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            kind: message.role,
            content: message.content.clone(),
            tabular_data: message.payload.clone(),
            timestamp: message.created_at,
            feedback: message.feedback,
        }
    }
}
