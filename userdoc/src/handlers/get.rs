//! Get user endpoint handlers.
//!
//! GET /user/{username} - Fetch one user by username.

use axum::{
    extract::{Path, State},
    Json,
};
use userdoc_core::user::User;

use crate::{
    error::{ApiError, Result},
    state::AppState,
};

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>> {
    tracing::info!(%username, "Fetching user");

    state
        .repository
        .find_by_username(&username)
        .await?
        .map(Json)
        .ok_or_else(ApiError::user_not_found)
}

/// Answers `/user/` with no username segment.
pub async fn missing_username() -> ApiError {
    ApiError::missing_username()
}
