//! HTTP handlers for the user API.

pub mod create;
pub mod get;
pub mod list;
pub mod update;

pub use create::create_user;
pub use get::{get_user, missing_username};
pub use list::list_users;
pub use update::update_user;
