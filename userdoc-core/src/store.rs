//! Store handles that own a backend and hand out typed collections.
//!
//! - [`DocumentStore`] - wraps a concrete backend until it is erased with `into_dyn`
//! - [`DynDocumentStore`] - dynamic dispatch store for runtime backend selection
//!
//! # Example
//!
//! ```ignore
//! let store = DocumentStore::new(backend).into_dyn();
//! let users = store.typed_collection::<User>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::DynTypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Erases the backend type so the store can be chosen at runtime.
    pub fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}

#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    pub fn typed_collection<'a, D: Document>(&'a self) -> DynTypedCollection<'a, D> {
        DynTypedCollection::new(D::collection_name().to_string(), &*self.backend)
    }

    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.backend.ping().await
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
