//! Create user endpoint handler.
//!
//! POST /user - Validate and store a new user.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use userdoc_core::user::User;

use crate::{
    error::{ApiError, Result},
    models::CreatedUser,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<User>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUser>)> {
    let Json(user) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected user payload");
        ApiError::invalid_payload()
    })?;

    user.validate()?;

    tracing::info!(username = %user.username, "Creating user");

    let user_id = state.repository.insert(&user).await?;

    Ok((StatusCode::CREATED, Json(CreatedUser { user_id })))
}
