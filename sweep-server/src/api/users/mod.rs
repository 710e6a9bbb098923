//! User API module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new().route("/{id}", get(handler::get_by_id))
}
