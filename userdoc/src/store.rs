//! Backend selection.
//!
//! Opens the configured backend and erases its type, so nothing past
//! startup depends on which one is in use.

use userdoc_core::{backend::StoreBackendBuilder, store::{DocumentStore, DynDocumentStore}};
use userdoc_memory::InMemoryStore;

use crate::{
    config::{BackendKind, StoreSettings},
    error::Result,
};

pub async fn open_store(settings: &StoreSettings) -> Result<DynDocumentStore> {
    match settings.backend {
        BackendKind::Memory => {
            tracing::warn!("Using the in-memory backend; data is lost on shutdown");

            Ok(DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn())
        }
        BackendKind::Mongodb => open_mongodb(settings).await,
    }
}

#[cfg(feature = "mongodb")]
async fn open_mongodb(settings: &StoreSettings) -> Result<DynDocumentStore> {
    use userdoc_mongodb::MongoDbStore;

    tracing::info!(database = %settings.database, "Using the MongoDB backend");

    let backend = MongoDbStore::builder(&settings.uri, &settings.database)
        .with_connect_timeout(settings.connect_timeout())
        .build()
        .await?;

    Ok(DocumentStore::new(backend).into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn open_mongodb(_settings: &StoreSettings) -> Result<DynDocumentStore> {
    Err(crate::error::ApiError::Config(
        "the mongodb backend requires building with the `mongodb` feature".to_string(),
    ))
}
