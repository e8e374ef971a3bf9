// ABOUTME: Redis session storage with connection management and retry on startup
// ABOUTME: Stores sessions as JSON documents with a creation-ordered id index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::SessionStorage;
use crate::config::storage::RedisConnectionConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use async_trait::async_trait;
use chat_core::constants::redis::{MESSAGE_INDEX_KEY, SESSION_INDEX_KEY, SESSION_KEY_PREFIX};
use dashmap::DashMap;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Redis session storage
///
/// Layout:
/// - `chat:session:{id}`: session JSON document
/// - `chat:sessions`: sorted set of session ids scored by creation micros
/// - `chat:message_index`: hash of message id -> session id
///
/// Read-modify-write of a session document is serialized by a per-session
/// async mutex held for the whole GET/SET sequence. The lock is process-local,
/// so several server instances writing the same session need an external
/// coordinator.
#[derive(Clone)]
pub struct RedisStorage {
    manager: ConnectionManager,
    session_locks: Arc<SessionLocks>,
}

/// Per-session async mutexes, kept only while some task holds or waits on one
#[derive(Default)]
struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Shared lock for `session_id`, created on first use
    fn handle(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id.to_owned())
            .or_default()
            .clone()
    }

    /// Return a handle; the entry is dropped once no other handle is out
    fn release(&self, session_id: &str, handle: Arc<Mutex<()>>) {
        drop(handle);
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn len(&self) -> usize {
        self.locks.len()
    }
}

impl RedisStorage {
    /// Connect to Redis at `redis_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or every connection attempt fails
    pub async fn connect(redis_url: &str, conn_config: &RedisConnectionConfig) -> AppResult<Self> {
        info!(
            "Connecting to Redis session storage (timeout={}s, response_timeout={}s, retries={})",
            conn_config.connection_timeout_secs,
            conn_config.response_timeout_secs,
            conn_config.initial_connection_retries
        );

        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;

        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Successfully connected to Redis");

        Ok(Self {
            manager,
            session_locks: Arc::new(SessionLocks::default()),
        })
    }

    /// Connect to Redis with exponential backoff retry on failure
    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> AppResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_exponent_base(conn_config.retry_exponent_base)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let max_delay_ms = conn_config.max_retry_delay_ms;

        let mut last_error = None;
        let mut delay_ms = conn_config.initial_retry_delay_ms;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms,
                            e
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(max_delay_ms);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::unavailable(format!(
            "Failed to connect to Redis after {} attempts: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }

    /// Build full Redis key for a session document
    fn session_key(session_id: &str) -> String {
        format!("{SESSION_KEY_PREFIX}{session_id}")
    }

    /// Number of sessions with an outstanding write lock
    #[must_use]
    pub fn active_session_locks(&self) -> usize {
        self.session_locks.len()
    }

    fn command_error(command: &str, e: &redis::RedisError) -> AppError {
        error!("Redis {} operation failed: {}", command, e);
        AppError::storage(format!("Redis {command} failed: {e}"))
    }

    async fn read_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        let mut conn = self.manager.clone();
        let data: Option<String> = conn
            .get(Self::session_key(session_id))
            .await
            .map_err(|e| Self::command_error("GET", &e))?;

        data.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn write_session(&self, session: &Session) -> AppResult<()> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(Self::session_key(&session.id), json)
            .await
            .map_err(|e| Self::command_error("SET", &e))
    }
}

#[async_trait]
impl SessionStorage for RedisStorage {
    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.manager.clone();

        let _: () = redis::pipe()
            .atomic()
            .set(Self::session_key(&session.id), json)
            .ignore()
            .zadd(
                SESSION_INDEX_KEY,
                &session.id,
                session.created_at.timestamp_micros(),
            )
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::command_error("MULTI/SET/ZADD", &e))?;

        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.read_session(session_id).await
    }

    async fn update_session<F, R>(&self, session_id: &str, update: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut Session) -> R + Send,
        R: Send,
    {
        let lock = self.session_locks.handle(session_id);

        let outcome: AppResult<Option<R>> = async {
            let _guard = lock.lock().await;

            let Some(mut session) = self.read_session(session_id).await? else {
                return Ok(None);
            };

            let result = update(&mut session);
            self.write_session(&session).await?;

            Ok(Some(result))
        }
        .await;

        self.session_locks.release(session_id, lock);
        outcome
    }

    async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        let mut conn = self.manager.clone();

        let ids: Vec<String> = conn
            .zrange(SESSION_INDEX_KEY, 0, -1)
            .await
            .map_err(|e| Self::command_error("ZRANGE", &e))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| Self::session_key(id)).collect();
        let documents: Vec<Option<String>> = conn
            .mget(&keys)
            .await
            .map_err(|e| Self::command_error("MGET", &e))?;

        let mut sessions = Vec::with_capacity(documents.len());
        for json in documents.into_iter().flatten() {
            sessions.push(serde_json::from_str(&json)?);
        }

        Ok(sessions)
    }

    async fn claim_message_id(&self, message_id: &str, session_id: &str) -> AppResult<bool> {
        let mut conn = self.manager.clone();
        conn.hset_nx(MESSAGE_INDEX_KEY, message_id, session_id)
            .await
            .map_err(|e| Self::command_error("HSETNX", &e))
    }

    async fn release_message_id(&self, message_id: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.hdel::<_, _, ()>(MESSAGE_INDEX_KEY, message_id)
            .await
            .map_err(|e| Self::command_error("HDEL", &e))
    }

    async fn message_owner(&self, message_id: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        conn.hget(MESSAGE_INDEX_KEY, message_id)
            .await
            .map_err(|e| Self::command_error("HGET", &e))
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::unavailable(format!("Redis health check failed: {e}")))?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(AppError::unavailable(format!(
                "Unexpected Redis PING response: {pong}"
            )))
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
