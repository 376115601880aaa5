//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the upload, download, and health routes.
//! - Inject shared application state (`AppState`) into handlers.
//! - Optionally terminate TLS with rustls.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;
