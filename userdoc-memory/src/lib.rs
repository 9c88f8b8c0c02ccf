//! In-memory document storage backend for userdoc.
//!
//! A thread-safe implementation of the `StoreBackend` trait, used for local
//! development and for the service's tests.
//!
//! - **Thread-safe access** - concurrent reads and writes through an async-aware `RwLock`
//! - **BSON storage** - documents are kept as BSON, each with a generated `ObjectId`
//! - **Query support** - filtering, sorting, skip and limit
//!
//! # Quick Start
//!
//! ```ignore
//! use userdoc_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use userdoc_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = InMemoryStore::builder().build().await.unwrap();
//!     let store = DocumentStore::new(backend).into_dyn();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdoc_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
