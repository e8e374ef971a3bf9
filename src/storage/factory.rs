// ABOUTME: Storage factory for environment-based backend selection
// ABOUTME: Wraps the in-memory and Redis backends behind one delegating type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{InMemoryStorage, RedisStorage, SessionStorage};
use crate::config::storage::{StorageBackend, StorageConfig};
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use async_trait::async_trait;
use tracing::info;

/// Storage instance wrapper that delegates to the configured backend
#[derive(Clone)]
pub enum Storage {
    /// Process-local storage
    Memory(InMemoryStorage),
    /// Redis-backed storage
    Redis(RedisStorage),
}

impl Storage {
    /// Create the backend selected by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis backend is selected and cannot be reached
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Initializing in-memory session storage");
                Ok(Self::memory())
            }
            StorageBackend::Redis => {
                let redis_url = config.redis_url.as_deref().ok_or_else(|| {
                    AppError::config("Redis URL is required for Redis session storage")
                })?;
                info!("Initializing Redis session storage");
                let storage = RedisStorage::connect(redis_url, &config.redis_connection).await?;
                Ok(Self::Redis(storage))
            }
        }
    }

    /// Fresh in-memory storage
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(InMemoryStorage::new())
    }
}

#[async_trait]
impl SessionStorage for Storage {
    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        match self {
            Self::Memory(storage) => storage.insert_session(session).await,
            Self::Redis(storage) => storage.insert_session(session).await,
        }
    }

    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        match self {
            Self::Memory(storage) => storage.get_session(session_id).await,
            Self::Redis(storage) => storage.get_session(session_id).await,
        }
    }

    async fn update_session<F, R>(&self, session_id: &str, update: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut Session) -> R + Send,
        R: Send,
    {
        match self {
            Self::Memory(storage) => storage.update_session(session_id, update).await,
            Self::Redis(storage) => storage.update_session(session_id, update).await,
        }
    }

    async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        match self {
            Self::Memory(storage) => storage.list_sessions().await,
            Self::Redis(storage) => storage.list_sessions().await,
        }
    }

    async fn claim_message_id(&self, message_id: &str, session_id: &str) -> AppResult<bool> {
        match self {
            Self::Memory(storage) => storage.claim_message_id(message_id, session_id).await,
            Self::Redis(storage) => storage.claim_message_id(message_id, session_id).await,
        }
    }

    async fn release_message_id(&self, message_id: &str) -> AppResult<()> {
        match self {
            Self::Memory(storage) => storage.release_message_id(message_id).await,
            Self::Redis(storage) => storage.release_message_id(message_id).await,
        }
    }

    async fn message_owner(&self, message_id: &str) -> AppResult<Option<String>> {
        match self {
            Self::Memory(storage) => storage.message_owner(message_id).await,
            Self::Redis(storage) => storage.message_owner(message_id).await,
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Memory(storage) => storage.health_check().await,
            Self::Redis(storage) => storage.health_check().await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(storage) => storage.backend_name(),
            Self::Redis(storage) => storage.backend_name(),
        }
    }
}
