use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use userdoc_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
};

use crate::query::MongoQueryTranslator;

fn backend_error(error: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(error.to_string())
}

/// Document storage backed by a MongoDB database.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(uri: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(uri, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Drops the server-assigned `_id`; callers address users by username.
    fn restore_document(mut document: Document) -> Document {
        document.remove("_id");
        document
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<ObjectId> {
        let result = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(backend_error)?;

        result.inserted_id
            .as_object_id()
            .ok_or_else(|| DocumentStoreError::Backend(
                format!("Unexpected inserted id: {}", result.inserted_id)
            ))
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(
            self.get_collection(collection)
                .find_one(MongoQueryTranslator::filter(Some(&filter))?)
                .await
                .map_err(backend_error)?
                .map(Self::restore_document)
        )
    }

    async fn update_one(&self, filter: Expr, fields: Document, collection: &str) -> DocumentStoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .update_one(
                    MongoQueryTranslator::filter(Some(&filter))?,
                    doc! { "$set": fields },
                )
                .await
                .map_err(backend_error)?
                .matched_count
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(MongoQueryTranslator::limit(limit));
        }
        if let Some(skip) = query.offset {
            options.skip = Some(MongoQueryTranslator::skip(skip));
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(MongoQueryTranslator::sort(sort));
        }

        Ok(
            self.get_collection(collection)
                .find(MongoQueryTranslator::filter(query.filter.as_ref())?)
                .with_options(options)
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(Self::restore_document)
                .collect()
        )
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(MongoQueryTranslator::filter(filter.as_ref())?)
            .await
            .map_err(backend_error)
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        tracing::debug!(database = %self.database, "Closing MongoDB client");
        self.client.shutdown().await;

        Ok(())
    }
}

/// Builder for [`MongoDbStore`].
///
/// Building only parses the URI and creates the client; the driver connects
/// lazily, so call `ping` to verify the server is reachable.
pub struct MongoDbStoreBuilder {
    uri: String,
    database: String,
    connect_timeout: Option<Duration>,
}

impl MongoDbStoreBuilder {
    pub fn new(uri: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
            connect_timeout: None,
        }
    }

    /// Bounds both connection establishment and server selection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
