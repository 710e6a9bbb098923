//! Authentication middleware
//!
//! Axum middleware for JWT authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::AppState;

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`.
/// On success a [`CurrentUser`] is injected into the request extensions.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (health endpoint, 404s)
/// - `/api/auth/login`, `/api/auth/register`
/// - `GET` reads under `/api/tickets` (public listing, as in the original
///   reporting app)
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes skip auth (they 404 on their own)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // Public API routes skip auth
    let is_public_api_route = path == "/api/auth/login"
        || path == "/api/auth/register"
        || (req.method() == http::Method::GET && path.starts_with("/api/tickets"));
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Request without credentials");
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token rejected");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
