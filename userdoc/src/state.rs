//! Shared application state.
use std::sync::Arc;

use userdoc_core::repository::UserRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<UserRepository>,
}

impl AppState {
    pub fn new(repository: Arc<UserRepository>) -> Self {
        Self { repository }
    }
}
