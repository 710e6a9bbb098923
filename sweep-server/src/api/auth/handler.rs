//! Authentication Handlers
//!
//! Registration, login, and current-user lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::api::convert::UserInfo;
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{ROLE_REPORTER, ROLE_VOLUNTEER, UserCreate};
use crate::db::repository::RepoError;
use crate::utils::validation::{MAX_PASSWORD_LEN, MAX_USERNAME_LEN, validate_required_text};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// "reporter" (default) or "volunteer"
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Register handler
///
/// Creates a user; the password is stored only as an argon2 hash.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserInfo>, AppError> {
    validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    // Admin accounts are provisioned out-of-band, never self-assigned
    let role = match req.role.as_deref() {
        None => ROLE_REPORTER.to_string(),
        Some(r) if r == ROLE_REPORTER || r == ROLE_VOLUNTEER => r.to_string(),
        Some(other) => {
            return Err(AppError::validation(format!("unknown role: {}", other)));
        }
    };

    let user = state
        .users
        .create(UserCreate {
            username: req.username.trim().to_string(),
            password: req.password,
            role,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::username_taken(msg),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id_string(), username = %user.username, "User registered");
    Ok(Json(user.into()))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.users.find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id_string();
    let token = state
        .jwt
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Get current user info
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    let record = state
        .users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    Ok(Json(record.into()))
}
