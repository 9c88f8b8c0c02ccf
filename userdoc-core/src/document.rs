//! Core traits for document representation and serialization.
//!
//! Documents carry no identifier of their own: the backend assigns one on
//! insert and strips it again when documents are read back.

use bson::{Bson, Document as BsonDocument, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Core trait that all documents stored in a document store must implement.
///
/// ```ignore
/// use userdoc_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Note {
///     pub title: String,
/// }
///
/// impl Document for Note {
///     fn collection_name() -> &'static str {
///         "notes"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Serialization helpers, implemented for every [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value is not a map.
    fn to_bson(&self) -> DocumentStoreResult<BsonDocument>;

    /// Creates a document from a BSON value.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<BsonDocument> {
        into_bson_document(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Serializes any map-shaped value (a JSON object, a struct) into a BSON document.
pub fn to_bson_document<T: Serialize>(value: &T) -> DocumentStoreResult<BsonDocument> {
    into_bson_document(serialize_to_bson(value)?)
}

fn into_bson_document(bson: Bson) -> DocumentStoreResult<BsonDocument> {
    match bson {
        Bson::Document(doc) => Ok(doc),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document, found {:?}",
            other.element_type()
        ))),
    }
}
