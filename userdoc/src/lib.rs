//! HTTP user service.
//!
//! Exposes create, fetch, partial update and list operations on user
//! records over JSON, on top of the `userdoc-core` repository. The library
//! half exists so the router can be driven directly in tests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ApiError, Result};
pub use router::router;
pub use state::AppState;
