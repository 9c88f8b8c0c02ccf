//! The user record and its required-field validation.

use bson::Document as BsonDocument;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    document::{Document, to_bson_document},
    error::DocumentStoreResult,
};

/// A user as stored in the `users` collection.
///
/// Absent or `null` fields decode to their empty value so that
/// [`User::validate`] can name the missing field. The password is kept
/// exactly as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiry_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub outputs: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub password: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields of a partial update.
///
/// The user's own fields must keep their types and cannot be `null`; any
/// other key is stored as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: BsonDocument,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.expiry_date.is_none()
            && self.outputs.is_none()
            && self.password.is_none()
            && self.extra.is_empty()
    }

    /// The `$set` document for this update.
    pub fn to_document(&self) -> DocumentStoreResult<BsonDocument> {
        to_bson_document(self)
    }
}

impl Document for User {
    fn collection_name() -> &'static str {
        "users"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username is required")]
    MissingUsername,
    #[error("expiry_date is required")]
    MissingExpiryDate,
    #[error("outputs are required")]
    MissingOutputs,
    #[error("password is required")]
    MissingPassword,
}

impl User {
    /// Reports the first required field that is empty, checked in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }

        if self.expiry_date == 0 {
            return Err(ValidationError::MissingExpiryDate);
        }

        if self.outputs.is_empty() {
            return Err(ValidationError::MissingOutputs);
        }

        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }

        Ok(())
    }
}
