//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait provides a unified async interface for the
//! storage operations the service needs: inserting a document, looking one
//! up by filter, applying a partial update, running a bounded query and
//! counting matches. Implementations must be `Send + Sync`.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use userdoc_core::{backend::StoreBackend, query::Filter};
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! let id = backend.insert_document(doc! { "username": "alice" }, "users").await?;
//! let found = backend.find_one(Filter::eq("username", "alice"), "users").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// Abstract interface for document storage backends.
///
/// Documents cross this boundary as plain BSON documents without their
/// store-assigned `_id`; backends add the id on insert and strip it on read.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a single document and returns the identifier the store generated for it.
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId>;

    /// Returns the first document matching `filter`, or `None` when nothing matches.
    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>>;

    /// Sets `fields` on the first document matching `filter`, leaving other fields untouched.
    ///
    /// Returns the number of matched documents (0 or 1).
    async fn update_one(
        &self,
        filter: Expr,
        fields: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Runs a filtered, sorted and bounded query.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Counts every document matching `filter`, ignoring pagination.
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> DocumentStoreResult<()>;

    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe mirror of [`StoreBackend`], implemented for every backend.
///
/// Lets the backend be chosen at runtime and stored as `Box<dyn DynStoreBackend>`.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId>;
    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>>;
    async fn update_one(
        &self,
        filter: Expr,
        fields: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64>;
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;
    async fn ping(&self) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId> {
        StoreBackend::insert_document(self, document, collection).await
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        StoreBackend::find_one(self, filter, collection).await
    }

    async fn update_one(
        &self,
        filter: Expr,
        fields: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        StoreBackend::update_one(self, filter, fields, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        StoreBackend::count_documents(self, filter, collection).await
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        StoreBackend::ping(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
