//! List users endpoint handler.
//!
//! GET /users - Filtered, sorted and paginated listing.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use userdoc_core::{page::Page, params::ListParams, user::User};

use crate::{
    error::{ApiError, Result},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<User>>> {
    let Query(pairs) = query
        .map_err(|_| ApiError::MalformedRequest("request payload is not valid".to_string()))?;

    let params = ListParams::from_pairs(pairs);

    tracing::info!(
        predicates = params.predicates.len(),
        page = params.pagination.page,
        limit = params.limit(),
        sort_by = %params.sort.field,
        "Listing users"
    );

    let (records, total_records) = state.repository.list(&params).await?;

    Ok(Json(params.pagination.page_of(records, total_records)))
}
