//! Response bodies that are not plain users or pages.
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub user_id: String,
}

/// Body of a successful `PATCH /user/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedUser {
    pub status: bool,
    pub message: String,
}

impl UpdatedUser {
    pub fn new(username: &str) -> Self {
        Self {
            status: true,
            message: format!("The user {username} has been successfully updated!"),
        }
    }
}
