//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user; fails with `not_found` if absent.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Snapshot of stored users, capped at the service's list limit.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
