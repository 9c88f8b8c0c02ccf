//! Store access for [`User`] records.
//!
//! Every store round-trip is bounded by the repository deadline; a call
//! that does not finish in time fails with [`DocumentStoreError::Timeout`].
//! Nothing is retried.

use std::{future::Future, time::Duration};

use bson::Document as BsonDocument;
use tokio::time::timeout;

use crate::{
    collection::DynTypedCollection,
    error::{DocumentStoreError, DocumentStoreResult},
    params::ListParams,
    query::Filter,
    store::DynDocumentStore,
    user::User,
};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct UserRepository {
    store: DynDocumentStore,
    deadline: Duration,
}

impl UserRepository {
    pub fn new(store: DynDocumentStore, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Gives the store back, e.g. to shut it down.
    pub fn into_store(self) -> DynDocumentStore {
        self.store
    }

    fn users(&self) -> DynTypedCollection<'_, User> {
        self.store.typed_collection::<User>()
    }

    async fn bounded<T>(
        &self,
        deadline: Duration,
        operation: impl Future<Output = DocumentStoreResult<T>>,
    ) -> DocumentStoreResult<T> {
        timeout(deadline, operation)
            .await
            .map_err(|_| DocumentStoreError::Timeout(deadline))?
    }

    /// Checks the store is reachable within `within`.
    pub async fn ping(&self, within: Duration) -> DocumentStoreResult<()> {
        self.bounded(within, self.store.ping()).await
    }

    /// Stores `user` and returns the generated id as a hex string.
    pub async fn insert(&self, user: &User) -> DocumentStoreResult<String> {
        let id = self
            .bounded(self.deadline, self.users().insert(user))
            .await?;

        tracing::debug!(user_id = %id, username = %user.username, "Inserted user");

        Ok(id.to_hex())
    }

    /// First user with this username, or `None`.
    pub async fn find_by_username(&self, username: &str) -> DocumentStoreResult<Option<User>> {
        self.bounded(
            self.deadline,
            self.users().find_one(Filter::eq("username", username)),
        )
        .await
    }

    /// Sets `fields` on the first user with this username and returns the matched count.
    pub async fn update_by_username(
        &self,
        username: &str,
        fields: BsonDocument,
    ) -> DocumentStoreResult<u64> {
        let matched = self
            .bounded(
                self.deadline,
                self.users()
                    .update_one(Filter::eq("username", username), fields),
            )
            .await?;

        tracing::debug!(username, matched, "Updated user");

        Ok(matched)
    }

    /// One page of users plus the number of users matching the filter overall.
    ///
    /// The page and the count are two separate reads, so the count can be
    /// stale relative to the page under concurrent writes.
    pub async fn list(&self, params: &ListParams) -> DocumentStoreResult<(Vec<User>, u64)> {
        let users = self.users();

        let records = self
            .bounded(self.deadline, users.query(params.to_query()))
            .await?;
        let total = self
            .bounded(self.deadline, users.count(params.filter()))
            .await?;

        tracing::debug!(
            returned = records.len(),
            total,
            skip = params.skip(),
            limit = params.limit(),
            "Listed users"
        );

        Ok((records, total))
    }
}
