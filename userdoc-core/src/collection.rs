//! Typed collection handles.
//!
//! A collection handle binds a document type to its collection name and a
//! borrowed backend, encoding documents to BSON on the way in and decoding
//! them on the way out.
//!
//! [`DynTypedCollection`] works over a dynamically dispatched backend, so
//! the same handle serves whichever backend was configured.
//!
//! # Example
//!
//! ```ignore
//! let users = store.typed_collection::<User>();
//! let id = users.insert(&user).await?;
//! let found = users.find_one(Filter::eq("username", "alice")).await?;
//! ```

use bson::{Bson, Document as BsonDocument, oid::ObjectId};
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

fn decode_all<D: Document>(documents: Vec<BsonDocument>) -> DocumentStoreResult<Vec<D>> {
    documents
        .into_iter()
        .map(|doc| D::from_bson(Bson::Document(doc)))
        .collect::<Result<Vec<D>, _>>()
}

#[derive(Debug)]
pub struct DynTypedCollection<'a, D: Document> {
    name: String,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> DynTypedCollection<'a, D> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn insert(&self, document: &D) -> DocumentStoreResult<ObjectId> {
        self.backend
            .insert_document(document.to_bson()?, self.name())
            .await
    }

    pub async fn find_one(&self, filter: Expr) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_one(filter, self.name())
            .await?
            .map(|doc| D::from_bson(Bson::Document(doc)))
            .transpose()
    }

    pub async fn update_one(&self, filter: Expr, fields: BsonDocument) -> DocumentStoreResult<u64> {
        self.backend
            .update_one(filter, fields, self.name())
            .await
    }

    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        decode_all(
            self.backend
                .query_documents(query, self.name())
                .await?,
        )
    }

    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(filter, self.name())
            .await
    }
}
