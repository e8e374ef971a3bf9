// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment configs and session storage backend selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: Server configuration from environment variables
//! - **Storage**: Session storage backend and Redis connection settings

/// Environment and server configuration
pub mod environment;
/// Session storage backend configuration
pub mod storage;

pub use environment::{CorsConfig, Environment, LogLevel, ServerConfig};
pub use storage::{RedisConnectionConfig, StorageBackend, StorageConfig};
