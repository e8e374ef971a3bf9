// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for ports, routes, storage keys and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being listed flat.

/// Service identity used in structured logs
pub mod service_names {
    /// Default service name
    pub const CHAT_SESSION_SERVER: &str = "chat-session-server";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3001;
    /// Default bind host
    pub const DEFAULT_HOST: &str = "127.0.0.1";
}

/// Route paths served by the router
pub mod routes {
    /// Optional prefix every session route is also served under
    pub const API_PREFIX: &str = "/api";
    /// List sessions
    pub const SESSIONS: &str = "/sessions";
    /// Create a session
    pub const NEW_CHAT: &str = "/new-chat";
    /// Session history
    pub const SESSION: &str = "/session/:session_id";
    /// Ask a question in a session
    pub const CHAT: &str = "/chat/:session_id";
    /// Rate an assistant reply
    pub const MESSAGE_FEEDBACK: &str = "/messages/:message_id/feedback";
    /// Liveness
    pub const HEALTH: &str = "/health";
    /// Readiness
    pub const READY: &str = "/ready";
}

/// Session defaults
pub mod sessions {
    /// Prefix of generated session titles, followed by local `HH:MM:SS`
    pub const DEFAULT_TITLE_PREFIX: &str = "Chat - ";
    /// `strftime` format for the time part of generated titles
    pub const DEFAULT_TITLE_TIME_FORMAT: &str = "%H:%M:%S";
}

/// Request limits
pub mod limits {
    /// Maximum request body size in bytes
    pub const MAX_REQUEST_SIZE: usize = 1_048_576; // 1MB
}

/// Redis key layout and connection defaults
pub mod redis {
    /// Prefix for session documents (`chat:session:{id}`)
    pub const SESSION_KEY_PREFIX: &str = "chat:session:";
    /// Sorted set of session ids scored by creation time in microseconds
    pub const SESSION_INDEX_KEY: &str = "chat:sessions";
    /// Hash of message id -> owning session id
    pub const MESSAGE_INDEX_KEY: &str = "chat:message_index";
    /// Connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;
    /// Response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 3;
    /// Reconnection retries after a dropped connection
    pub const RECONNECTION_RETRIES: usize = 3;
    /// Exponential backoff base
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    /// Maximum delay between retries in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 5_000;
    /// Retries for the initial connection at startup
    pub const INITIAL_CONNECTION_RETRIES: u32 = 5;
    /// First retry delay in milliseconds
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}
