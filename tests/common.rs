// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, in-memory resources and the assembled router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `chat_session_api`

use axum::Router;
use chat_session_api::{
    resources::ServerResources, server::build_router, services::SessionStore, test_utils,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// In-memory session store
pub fn create_test_store() -> SessionStore {
    init_test_logging();
    test_utils::create_test_store()
}

/// Server resources over in-memory storage with a fixed "pong" reply
pub fn create_test_resources() -> Arc<ServerResources> {
    init_test_logging();
    test_utils::create_test_resources()
}

/// Fully layered application router plus the resources behind it
pub fn create_test_app() -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources();
    (build_router(Arc::clone(&resources)), resources)
}
