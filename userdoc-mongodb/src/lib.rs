//! MongoDB backend implementation for userdoc.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Filters are translated to native MongoDB queries; sorting, skip and limit
//! are pushed down to the server.
//!
//! The service enables it through its default `mongodb` feature.
//!
//! # Connection
//!
//! The builder takes a connection URI and a database name. Building does not
//! contact the server; use `ping` to check connectivity.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use userdoc_core::backend::StoreBackendBuilder;
//! use userdoc_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "test")
//!         .with_connect_timeout(Duration::from_secs(10))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdoc_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
