// ABOUTME: Session store domain service owning session and message lifecycle
// ABOUTME: Create, list, get, append-message and set-feedback over pluggable storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session lifecycle operations.
//!
//! Business rules:
//! - Session titles are fixed at creation; a missing or blank title becomes
//!   `"Chat - HH:MM:SS"` in local time
//! - Messages are append-only and kept in chronological order
//! - Message ids are unique across the whole store
//! - Feedback only lands on assistant messages and the latest value wins
//! - An unknown id is a normal outcome (`None`/`false`), never an error

use crate::errors::{AppError, AppResult};
use crate::models::{Feedback, Message, MessageRole, Session, SessionSummary, StructuredPayload};
use crate::services::reply::ReplyGenerator;
use crate::storage::{SessionStorage, Storage};
use chat_core::constants::sessions::{DEFAULT_TITLE_PREFIX, DEFAULT_TITLE_TIME_FORMAT};
use chrono::{DateTime, Local, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Attempts at drawing an unused message id before giving up
const MAX_MESSAGE_ID_ATTEMPTS: usize = 8;

/// Fields of a message to append
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Author
    pub role: MessageRole,
    /// Text content
    pub content: String,
    /// Optional structured document
    pub payload: Option<StructuredPayload>,
    /// Initial rating, ignored for user messages
    pub feedback: Option<Feedback>,
}

impl NewMessage {
    /// A plain user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            payload: None,
            feedback: None,
        }
    }

    /// An assistant reply with an optional structured payload
    pub fn assistant(content: impl Into<String>, payload: Option<StructuredPayload>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            payload,
            feedback: None,
        }
    }
}

/// Timestamp source whose readings strictly increase at microsecond resolution
#[derive(Debug, Default)]
struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let previous = self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or(wall);
        let micros = wall.max(previous + 1);

        DateTime::from_timestamp_micros(micros).unwrap_or_else(Utc::now)
    }
}

/// Session store over a [`SessionStorage`] backend
#[derive(Clone)]
pub struct SessionStore<S = Storage> {
    storage: S,
    clock: Arc<MonotonicClock>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create a store over `storage`
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: Arc::new(MonotonicClock::default()),
        }
    }

    /// Underlying storage backend
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Create and persist a new, empty session
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails
    pub async fn create_session(&self, title: Option<&str>) -> AppResult<Session> {
        let created_at = self.clock.now();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| default_title(created_at), ToOwned::to_owned);

        let session = Session {
            id: Uuid::new_v4().to_string(),
            title,
            created_at,
            messages: Vec::new(),
        };

        self.storage.insert_session(&session).await?;

        info!(
            session.id = %session.id,
            session.title = %session.title,
            storage = self.storage.backend_name(),
            "Session created"
        );

        Ok(session)
    }

    /// Summaries of every session, newest first (ties: id descending)
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails
    pub async fn list_sessions(&self) -> AppResult<Vec<SessionSummary>> {
        let mut summaries: Vec<SessionSummary> = self
            .storage
            .list_sessions()
            .await?
            .iter()
            .map(Session::summary)
            .collect();

        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        debug!(count = summaries.len(), "Listed sessions");
        Ok(summaries)
    }

    /// Look up a session by id; `None` when unknown
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails
    pub async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.storage.get_session(session_id).await
    }

    /// Append a message to a session; `None` (and no side effects) when the
    /// session is unknown
    ///
    /// Feedback supplied with a user message is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails or no unused message id
    /// could be drawn
    pub async fn append_message(
        &self,
        session_id: &str,
        new_message: NewMessage,
    ) -> AppResult<Option<Message>> {
        let feedback = match new_message.role {
            MessageRole::Assistant => new_message.feedback,
            MessageRole::User => {
                if new_message.feedback.is_some() {
                    debug!(session.id = %session_id, "Dropped feedback on user message");
                }
                None
            }
        };

        let message_id = self.claim_message_id(session_id).await?;

        let message = Message {
            id: message_id,
            role: new_message.role,
            content: new_message.content,
            payload: new_message.payload,
            feedback,
            created_at: self.clock.now(),
        };

        let appended = message.clone();
        let update_result = self
            .storage
            .update_session(session_id, move |session| {
                session.messages.push(appended);
                session.messages.len()
            })
            .await;

        let message_count = match update_result {
            Ok(Some(count)) => count,
            Ok(None) => {
                self.storage.release_message_id(&message.id).await?;
                debug!(session.id = %session_id, "Append to unknown session ignored");
                return Ok(None);
            }
            Err(e) => {
                if let Err(release_error) = self.storage.release_message_id(&message.id).await {
                    warn!(
                        message.id = %message.id,
                        error = %release_error,
                        "Failed to release message id after append error"
                    );
                }
                return Err(e);
            }
        };

        info!(
            session.id = %session_id,
            message.id = %message.id,
            message.role = %message.role,
            session.message_count = message_count,
            "Message appended"
        );

        Ok(Some(message))
    }

    /// Append `question` as a user message followed by the generated reply
    ///
    /// Returns the assistant message, or `None` (and no side effects) when the
    /// session is unknown. If the reply cannot be stored the question stays in
    /// the session unanswered.
    ///
    /// # Errors
    ///
    /// Returns an error if either append fails
    pub async fn record_exchange(
        &self,
        session_id: &str,
        question: &str,
        generator: &dyn ReplyGenerator,
    ) -> AppResult<Option<Message>> {
        let Some(user_message) = self
            .append_message(session_id, NewMessage::user(question))
            .await?
        else {
            return Ok(None);
        };

        let reply = generator.generate(question);
        match self
            .append_message(
                session_id,
                NewMessage::assistant(reply.content, reply.payload),
            )
            .await
        {
            Ok(assistant) => Ok(assistant),
            Err(e) => {
                warn!(
                    session.id = %session_id,
                    message.id = %user_message.id,
                    error = %e,
                    "Question stored without a reply"
                );
                Err(e)
            }
        }
    }

    /// Set feedback on an assistant message, overwriting any previous value
    ///
    /// Returns `false` when no assistant message with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails
    pub async fn set_feedback(&self, message_id: &str, feedback: Feedback) -> AppResult<bool> {
        let Some(session_id) = self.storage.message_owner(message_id).await? else {
            debug!(message.id = %message_id, "Feedback for unknown message ignored");
            return Ok(false);
        };

        let updated = self
            .storage
            .update_session(&session_id, |session| {
                let target = session
                    .messages
                    .iter_mut()
                    .find(|m| m.id == message_id && m.role == MessageRole::Assistant);
                match target {
                    Some(message) => {
                        message.feedback = Some(feedback);
                        true
                    }
                    None => false,
                }
            })
            .await?
            .unwrap_or(false);

        if updated {
            info!(
                session.id = %session_id,
                message.id = %message_id,
                feedback = %feedback,
                "Feedback recorded"
            );
        }

        Ok(updated)
    }

    /// Draw a fresh message id and record it as owned by `session_id`
    async fn claim_message_id(&self, session_id: &str) -> AppResult<String> {
        for _ in 0..MAX_MESSAGE_ID_ATTEMPTS {
            let candidate = Uuid::new_v4().to_string();
            if self.storage.claim_message_id(&candidate, session_id).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::internal("Could not allocate a unique message id"))
    }
}

/// `"Chat - HH:MM:SS"` in local time
fn default_title(created_at: DateTime<Utc>) -> String {
    format!(
        "{DEFAULT_TITLE_PREFIX}{}",
        created_at
            .with_timezone(&Local)
            .format(DEFAULT_TITLE_TIME_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_strictly_increases() {
        let clock = MonotonicClock::default();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let next = clock.now();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_default_title_format() {
        let title = default_title(Utc::now());
        let time = title.strip_prefix("Chat - ").unwrap();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
    }
}
