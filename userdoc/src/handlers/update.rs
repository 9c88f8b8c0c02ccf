//! Update user endpoint handler.
//!
//! PATCH /user/{username} - Set the given fields on one user.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use userdoc_core::user::UserUpdate;

use crate::{
    error::{ApiError, Result},
    models::UpdatedUser,
    state::AppState,
};

/// The user's own fields are type-checked; unknown fields are stored too.
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdatedUser>> {
    let fields = match payload {
        Ok(Json(Value::Object(fields))) => fields,
        Ok(Json(_)) => return Err(ApiError::invalid_payload()),
        Err(rejection) => {
            tracing::debug!(%rejection, "Rejected update payload");
            return Err(ApiError::invalid_payload());
        }
    };

    // Operator keys would turn the `$set` into a different update.
    if fields.keys().any(|key| key.starts_with('$')) {
        return Err(ApiError::invalid_payload());
    }

    let update: UserUpdate = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        tracing::debug!(error = %e, "Rejected update fields");
        ApiError::invalid_payload()
    })?;

    if update.is_empty() {
        return Err(ApiError::invalid_payload());
    }

    // Values BSON cannot hold, such as integers above i64::MAX, are bad input.
    let fields = update.to_document().map_err(|e| {
        tracing::debug!(error = %e, "Update fields not representable in BSON");
        ApiError::invalid_payload()
    })?;

    tracing::info!(
        %username,
        fields = ?fields.keys().collect::<Vec<_>>(),
        "Updating user"
    );

    let matched = state
        .repository
        .update_by_username(&username, fields)
        .await?;

    if matched == 0 {
        return Err(ApiError::user_not_found());
    }

    Ok(Json(UpdatedUser::new(&username)))
}
