//! Auth API module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
