//! Axum middleware layers applied to the router.
//!
//! Request tracing, timeout enforcement, and the upload body limit.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Attach the shared middleware stack to `router`.
///
/// The body limit replaces axum's 2 MiB default so uploads up to
/// `max_upload_bytes` reach the handler.
pub fn apply<S>(router: axum::Router<S>, max_upload_bytes: usize, timeout: Duration) -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
}
