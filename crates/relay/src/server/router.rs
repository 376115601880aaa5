//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use common::protocol::{DOWNLOAD_PREFIX, HEALTH_ROUTE, UPLOAD_ROUTE};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    let limit = state.max_upload_bytes;
    let routes = Router::new()
        .route(UPLOAD_ROUTE, post(handlers::upload))
        .route(&format!("/{DOWNLOAD_PREFIX}/:id"), get(handlers::download))
        .route(HEALTH_ROUTE, get(handlers::health))
        .fallback(handlers::not_found);

    middleware::apply(routes, limit, request_timeout).with_state(state)
}
