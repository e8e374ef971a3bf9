// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Session lifecycle and assistant reply generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Protocol-agnostic business logic. Route handlers stay thin and delegate
//! here, so the same rules apply regardless of the entry point.

/// Placeholder assistant replies
pub mod reply;

/// Session and message lifecycle
pub mod session_store;

pub use reply::{GeneratedReply, PlaceholderReplyGenerator, ReplyGenerator};
pub use session_store::{NewMessage, SessionStore};
