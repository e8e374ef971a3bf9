// ABOUTME: In-memory session storage backed by concurrent hash maps
// ABOUTME: Per-shard locking gives per-session atomic read-modify-write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::SessionStorage;
use crate::errors::AppResult;
use crate::models::Session;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory session storage
///
/// Sessions live for the lifetime of the process. `DashMap` write guards are
/// only held inside synchronous sections, never across an `.await`.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    sessions: Arc<DashMap<String, Session>>,
    message_index: Arc<DashMap<String, String>>,
}

impl InMemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStorage for InMemoryStorage {
    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone()))
    }

    async fn update_session<F, R>(&self, session_id: &str, update: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut Session) -> R + Send,
        R: Send,
    {
        Ok(self
            .sessions
            .get_mut(session_id)
            .map(|mut entry| update(entry.value_mut())))
    }

    async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn claim_message_id(&self, message_id: &str, session_id: &str) -> AppResult<bool> {
        match self.message_index.entry(message_id.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(session_id.to_owned());
                Ok(true)
            }
        }
    }

    async fn release_message_id(&self, message_id: &str) -> AppResult<()> {
        self.message_index.remove(message_id);
        Ok(())
    }

    async fn message_owner(&self, message_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .message_index
            .get(message_id)
            .map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
