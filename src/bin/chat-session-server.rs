// ABOUTME: Chat session API server binary
// ABOUTME: Loads configuration, initializes logging and storage, then serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Session Server Binary
//!
//! Starts the chat session HTTP API with the storage backend selected by
//! `SESSION_STORAGE` (or `--storage`).

use anyhow::Result;
use chat_session_api::{
    config::{environment::ServerConfig, storage::StorageBackend},
    logging,
    resources::ServerResources,
    server,
    storage::SessionStorage,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chat-session-server")]
#[command(about = "Chat session API - sessions, messages and reply feedback over HTTP")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override session storage backend (memory, redis)
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// Override Redis URL
    #[arg(long)]
    redis_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(storage) = args.storage {
        config.storage.backend = storage;
    }
    if let Some(redis_url) = args.redis_url {
        config.storage.redis_url = Some(redis_url);
    }
    config.storage.validate()?;

    logging::init_with_level(config.log_level)?;

    info!("Starting chat session server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!(
        "Session storage initialized: {}",
        resources.store.storage().backend_name()
    );

    if let Err(e) = server::run(resources).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
