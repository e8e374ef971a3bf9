// ABOUTME: Route module organization for the chat session server HTTP endpoints
// ABOUTME: Provides route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Health check and readiness routes
pub mod health;
/// Chat session routes
pub mod sessions;

/// Health check route handlers
pub use health::HealthRoutes;
/// Session route handlers
pub use sessions::SessionRoutes;
