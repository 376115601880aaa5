//! Axum request handlers for all relay endpoints.
//!
//! Frame bodies are treated as opaque bytes: they are size-checked, written,
//! and streamed back, but never parsed or logged.

use axum::{
    body::Body,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use common::protocol::{ErrorResponse, HealthResponse, MIN_FRAME_LEN};
use common::RelayError;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use super::state::AppState;

/// `POST /share`: store a frame and respond with its identifier as plain text.
///
/// Bodies over the configured limit get `413`; bodies shorter than a nonce
/// plus a tag get `400`.
pub async fn upload(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return error_response(RelayError::PayloadTooLarge {
                limit: state.max_upload_bytes,
            });
        }
        Err(rejection) => return error_response(RelayError::BadRequest(rejection.body_text())),
    };

    if body.len() < MIN_FRAME_LEN {
        return error_response(RelayError::BadRequest(format!(
            "frame must be at least {MIN_FRAME_LEN} bytes"
        )));
    }

    match state.store.put(&body).await {
        Ok(id) => {
            info!(id = %id, bytes = body.len(), "share stored");
            (StatusCode::OK, id).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// `GET /get/:id`: stream the stored frame back unchanged.
pub async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (file, len) = match state.store.open_blob(&id).await {
        Ok(found) => found,
        Err(e) => return error_response(e.into()),
    };

    info!(id = %id, bytes = len, "share served");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response()
}

/// `GET /health`: liveness check.
///
/// Returns `200 OK` while the share directory is readable, `503` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let (status_code, body) = match state.store.count().await {
        Ok(blobs_stored) => (
            StatusCode::OK,
            HealthResponse {
                status: "ok".into(),
                blobs_stored,
            },
        ),
        Err(e) => {
            warn!(error = %e, "share directory unreadable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "degraded".into(),
                    blobs_stored: 0,
                },
            )
        }
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`RelayError`] as its status code and JSON body.
///
/// Internal details are logged, not returned.
pub fn error_response(err: RelayError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match &err {
        RelayError::Internal(detail) => {
            error!(error = %detail, "request failed");
            "internal error".to_owned()
        }
        RelayError::NotFound => "Share not found".to_owned(),
        other => other.to_string(),
    };
    (status, Json(ErrorResponse::new(err.code(), message))).into_response()
}
