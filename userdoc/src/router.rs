//! Route table for the user API.
//!
//! - POST /user - Create a user
//! - GET /user/:username - Fetch a user
//! - PATCH /user/:username - Partially update a user
//! - GET /users - List users with filters, sorting and pagination

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{create_user, get_user, list_users, missing_username, update_user},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/", get(missing_username).patch(missing_username))
        .route("/user/:username", get(get_user).patch(update_user))
        .route("/users", get(list_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
