//! Driven port for the user collection and its persistence errors.
//!
//! Adapters translate between the store's document layout and domain types.
//! Every method maps onto one single-document (or one bulk) store operation;
//! consistency relies on the store's per-operation atomicity.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// An operation reached the store but failed.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port over the collection of stored users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new record and return it with its generated identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Return up to `limit` records in storage order.
    async fn list(&self, limit: usize) -> Result<Vec<User>, UserPersistenceError>;

    /// Apply a merge-patch and return the record after the change.
    ///
    /// Returns `Ok(None)` when no record has the identifier. An empty patch
    /// reads the record without writing.
    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a record; returns whether one was present.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Remove every record; returns how many were removed.
    async fn delete_all(&self) -> Result<u64, UserPersistenceError>;
}
