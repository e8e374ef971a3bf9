// ABOUTME: Blanket OPTIONS handling for every path
// ABOUTME: Answers any OPTIONS request with 200 and an empty body before routing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Short-circuit `OPTIONS` with an empty 200 response, for any path
pub async fn handle_options(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    next.run(request).await
}
