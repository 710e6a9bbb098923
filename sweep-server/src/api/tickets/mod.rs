//! Ticket API module
//!
//! Reads are public; every mutation requires a bearer token (enforced by the
//! router-level auth middleware).

mod handler;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::AppState;

/// Body cap for image-bearing requests: 10MB raw image plus base64 and
/// multipart overhead
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/classify", post(handler::classify))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/classify", post(handler::reclassify))
        .route("/{id}/status", put(handler::update_status))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
