//! In-memory storage implementation for document stores.
//!
//! Documents are kept per collection in insertion order, each paired with
//! the `ObjectId` generated when it was inserted, behind an async-aware
//! read-write lock.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use mea::rwlock::RwLock;

use userdoc_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::DocumentStoreResult,
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{DocumentEvaluator, compare_by_field};

type CollectionEntries = Vec<(ObjectId, Document)>;
type StoreMap = HashMap<String, CollectionEntries>;

fn matching<'a>(
    entries: &'a CollectionEntries,
    filter: Option<&'a Expr>,
) -> impl Iterator<Item = &'a Document> + 'a {
    entries
        .iter()
        .map(|(_, doc)| doc)
        .filter(move |doc| filter.is_none_or(|expr| DocumentEvaluator::matches(doc, expr)))
}

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same data. Queries scan the whole collection; there are
/// no indexes and no uniqueness constraints.
///
/// # Example
///
/// ```ignore
/// use userdoc_memory::InMemoryStore;
/// use userdoc_core::{backend::StoreBackend, query::Filter};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// store.insert_document(doc! { "username": "alice" }, "users").await?;
/// let found = store.find_one(Filter::eq("username", "alice"), "users").await?;
/// assert!(found.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<ObjectId> {
        let id = ObjectId::new();

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id, document));

        Ok(id)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .and_then(|entries| matching(entries, Some(&filter)).next())
                .cloned()
        )
    }

    async fn update_one(&self, filter: Expr, fields: Document, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;

        let target = store
            .get_mut(collection)
            .and_then(|entries| {
                entries
                    .iter_mut()
                    .map(|(_, doc)| doc)
                    .find(|doc| DocumentEvaluator::matches(doc, &filter))
            });

        match target {
            Some(doc) => {
                // Same as `$set`: existing keys keep their position, new keys are appended.
                for (key, value) in fields {
                    doc.insert(key, value);
                }

                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let entries = match store.get(collection) {
            Some(entries) => entries,
            None => return Ok(vec![]),
        };

        let mut documents = matching(entries, query.filter.as_ref()).collect::<Vec<_>>();

        // Stable sort, so ties keep insertion order.
        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| {
                let ordering = compare_by_field(a, b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        Ok(
            documents
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        )
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .map(|entries| matching(entries, filter.as_ref()).count() as u64)
                .unwrap_or(0)
        )
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
