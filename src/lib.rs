// ABOUTME: Main library entry point for the chat session API
// ABOUTME: Sessions, append-only message history and reply feedback served over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Chat Session API
//!
//! A small chat-session service: clients create sessions, ask questions,
//! receive placeholder assistant replies carrying a random table, and rate
//! those replies.
//!
//! ## Architecture
//!
//! - **Models**: sessions, messages, feedback and their wire views
//! - **Storage**: pluggable keyed store (in-memory or Redis) behind one trait
//! - **Services**: the session store and the reply generator
//! - **Routes**: thin axum handlers mapping HTTP onto the session store
//! - **Server**: middleware stack, listener and graceful shutdown
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chat_session_api::services::SessionStore;
//! use chat_session_api::storage::Storage;
//! use chat_session_api::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = SessionStore::new(Storage::memory());
//!     let session = store.create_session(Some("Quarterly numbers")).await?;
//!     println!("Created session {}", session.id);
//!     Ok(())
//! }
//! ```

/// Configuration loaded from the environment
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for CORS, request tracing and OPTIONS handling
pub mod middleware;

/// Sessions, messages and wire views
pub mod models;

/// Shared resources handed to route handlers
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Session store and reply generation
pub mod services;

/// Session storage backends
pub mod storage;

/// Test utilities for creating consistent test data
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
