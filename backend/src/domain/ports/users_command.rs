//! Driving port for user mutations.
//!
//! HTTP handlers call this port with already-parsed domain values; failures
//! come back as domain [`Error`]s ready for the adapter's error mapping.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserId, UserPatch};

/// Use-case port for creating, patching and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Apply a merge-patch; fails with `not_found` if the user is absent.
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error>;

    /// Delete one user. Succeeds whether or not the user existed.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;

    /// Delete every user and report how many were removed.
    async fn delete_all_users(&self) -> Result<u64, Error>;
}
