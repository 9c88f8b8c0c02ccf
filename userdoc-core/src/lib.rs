//! Core of the userdoc workspace: a thin JSON document layer plus the user
//! domain built on it.
//!
//! - **Documents** ([`document`]) - the `Document` trait and BSON conversion
//! - **Backends** ([`backend`]) - traits implemented by storage backends
//! - **Queries** ([`query`]) - filter expressions, sorting, pagination
//! - **Collections** ([`collection`]) and **stores** ([`store`]) - typed handles over a backend
//! - **Pages** ([`page`]) - pagination parameters and result pages
//! - **List parameters** ([`params`]) - query-string to query translation
//! - **Users** ([`user`]) - the user record and its validation
//! - **Repository** ([`repository`]) - deadline-bounded user store access
//! - **Errors** ([`error`])
//!
//! # Example
//!
//! ```ignore
//! use userdoc_core::{repository::UserRepository, store::DocumentStore, user::User};
//! use userdoc_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new()).into_dyn();
//! let repository = UserRepository::new(store, std::time::Duration::from_secs(5));
//! let id = repository.insert(&user).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdoc_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod page;
pub mod params;
pub mod query;
pub mod repository;
pub mod store;
pub mod user;
