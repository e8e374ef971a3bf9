// ABOUTME: Unified error handling for the chat session API
// ABOUTME: Re-exports the error types defined in chat-core for crate-wide use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error types shared by storage, services and routes.
//!
//! The definitions live in `chat-core` so they can be reused without pulling
//! in the server; this module keeps the `crate::errors` path stable.

pub use chat_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails};
