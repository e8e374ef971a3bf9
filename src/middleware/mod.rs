// ABOUTME: HTTP middleware for CORS, request tracing and OPTIONS handling
// ABOUTME: Provides request ID spans and cross-origin configuration for the router

pub mod cors;
pub mod options;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Blanket OPTIONS responses
pub use options::handle_options;

// Request tracing
pub use self::tracing::{create_request_span, REQUEST_ID_HEADER};
