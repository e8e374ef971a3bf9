// ABOUTME: Session storage abstraction with pluggable backends
// ABOUTME: Keyed record store for sessions plus a global message-id index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Storage
//!
//! The session store only talks to [`SessionStorage`], so the same lifecycle
//! logic runs against a process-local map or an external Redis instance.
//!
//! Besides the session records themselves, every backend keeps a secondary
//! index from message id to owning session id. Message ids are claimed in
//! that index before the message is appended, which is what makes them
//! unique across the whole store and lets feedback lookups skip a scan over
//! every session.

/// Runtime backend selection
pub mod factory;
/// In-memory backend
pub mod memory;
/// Redis backend
pub mod redis;

use crate::errors::AppResult;
use crate::models::Session;
use async_trait::async_trait;

pub use factory::Storage;
pub use memory::InMemoryStorage;
pub use redis::RedisStorage;

/// Storage provider trait for pluggable backend implementations
#[async_trait]
pub trait SessionStorage: Send + Sync + Clone {
    /// Persist a newly created session
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails
    async fn insert_session(&self, session: &Session) -> AppResult<()>;

    /// Look up a session by exact id
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails. An unknown id is `Ok(None)`.
    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Apply `update` to a session as one atomic read-modify-write
    ///
    /// Returns `Ok(None)` without calling `update` when the session is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read or write fails
    async fn update_session<F, R>(&self, session_id: &str, update: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut Session) -> R + Send,
        R: Send;

    /// Point-in-time snapshot of every stored session, in no particular order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    async fn list_sessions(&self) -> AppResult<Vec<Session>>;

    /// Record `message_id` as owned by `session_id` unless the id is taken
    ///
    /// Returns `false` when the id already exists in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails
    async fn claim_message_id(&self, message_id: &str, session_id: &str) -> AppResult<bool>;

    /// Drop a claim made by [`Self::claim_message_id`] that was never used
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails
    async fn release_message_id(&self, message_id: &str) -> AppResult<()>;

    /// Session owning `message_id`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    async fn message_owner(&self, message_id: &str) -> AppResult<Option<String>>;

    /// Verify the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend does not respond
    async fn health_check(&self) -> AppResult<()>;

    /// Short backend description for logs
    fn backend_name(&self) -> &'static str;
}
