//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::UserInfo;
use crate::core::AppState;
use crate::utils::{AppError, AppResult};

/// GET /api/users/:id - user profile, credential hash stripped
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.into()))
}
