// ABOUTME: HTTP server assembly and lifecycle for the chat session API
// ABOUTME: Builds the router with middleware, binds the listener and shuts down on signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server assembly
//!
//! Session routes are served both at the root and under `/api`. Layer order,
//! outermost first: request id, tracing, CORS, OPTIONS short-circuit, body
//! limit.

use crate::errors::AppError;
use crate::middleware::{create_request_span, handle_options, setup_cors, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::{HealthRoutes, SessionRoutes};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, Uri},
    middleware, Router,
};
use chat_core::constants::{limits::MAX_REQUEST_SIZE, routes};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let session_routes = SessionRoutes::routes(Arc::clone(&resources));
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(session_routes.clone())
        .nest(routes::API_PREFIX, session_routes)
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_SIZE))
        .layer(middleware::from_fn(handle_options))
        .layer(setup_cors(&resources.config.cors))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span::<Body>))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound, or
/// the server fails while running
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = resources.config.bind_address()?;
    let app = build_router(Arc::clone(&resources));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Chat session server listening on http://{}", addr);
    log_endpoints(&addr.to_string());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Chat session server shutdown complete");
    Ok(())
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

fn log_endpoints(base: &str) {
    info!("=== Available API Endpoints ===");
    info!("  GET  http://{base}{}", routes::SESSIONS);
    info!("  GET  http://{base}{}?title=", routes::NEW_CHAT);
    info!("  GET  http://{base}{}", routes::SESSION);
    info!("  POST http://{base}{}", routes::CHAT);
    info!("  POST http://{base}{}", routes::MESSAGE_FEEDBACK);
    info!("  GET  http://{base}{}", routes::HEALTH);
    info!("  GET  http://{base}{}", routes::READY);
    info!("Session routes are also served under {}", routes::API_PREFIX);
}

/// Resolve on SIGINT (Ctrl-C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
