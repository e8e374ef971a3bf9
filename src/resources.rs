// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Bundles the session store, reply generator and configuration behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::ServerConfig;
use crate::errors::AppResult;
use crate::services::{PlaceholderReplyGenerator, ReplyGenerator, SessionStore};
use crate::storage::Storage;
use std::sync::Arc;

/// Resources shared across request handlers
///
/// Created once at startup and passed to routers as `Arc<ServerResources>`.
pub struct ServerResources {
    /// Session and message lifecycle
    pub store: SessionStore,
    /// Assistant reply source
    pub reply_generator: Arc<dyn ReplyGenerator>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from already-built parts
    #[must_use]
    pub fn new(
        store: SessionStore,
        reply_generator: Arc<dyn ReplyGenerator>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            store,
            reply_generator,
            config,
        }
    }

    /// Connect the configured storage backend and use the placeholder reply generator
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let storage = Storage::new(&config.storage).await?;

        Ok(Self::new(
            SessionStore::new(storage),
            Arc::new(PlaceholderReplyGenerator::default()),
            Arc::new(config),
        ))
    }
}
