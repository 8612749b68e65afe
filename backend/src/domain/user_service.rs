//! User domain service.
//!
//! Implements the `UsersCommand` and `UsersQuery` driving ports on top of a
//! `UserRepository`. The service owns two decisions the store does not make:
//! a missing record is a `not_found` error, and listings are capped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, NewUser, User, UserId, UserPatch};

/// Maximum number of users returned by a listing unless configured otherwise.
pub const DEFAULT_LIST_LIMIT: usize = 100;

fn map_repository_error(error: UserPersistenceError) -> Error {
    debug!(%error, "user repository operation failed");
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// User service implementing both driving ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use user_service::domain::UserService;
/// use user_service::outbound::memory::InMemoryUserRepository;
///
/// let service = UserService::new(Arc::new(InMemoryUserRepository::new())).with_list_limit(10);
/// assert_eq!(service.list_limit(), 10);
/// ```
pub struct UserService<R: ?Sized> {
    repository: Arc<R>,
    list_limit: usize,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            list_limit: self.list_limit,
        }
    }
}

impl<R: ?Sized> UserService<R> {
    /// Create a service over `repository` using [`DEFAULT_LIST_LIMIT`].
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Override the listing cap. A zero limit is raised to one.
    #[must_use]
    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit.max(1);
        self
    }

    /// Configured listing cap.
    pub fn list_limit(&self) -> usize {
        self.list_limit
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        let created = self
            .repository
            .insert(&user)
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %created.id(), "user created");
        Ok(created)
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        self.repository
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %id, removed, "user delete processed");
        Ok(())
    }

    async fn delete_all_users(&self) -> Result<u64, Error> {
        let removed = self
            .repository
            .delete_all()
            .await
            .map_err(map_repository_error)?;
        info!(removed, "all users deleted");
        Ok(removed)
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let mut users = self
            .repository
            .list(self.list_limit)
            .await
            .map_err(map_repository_error)?;
        users.truncate(self.list_limit);
        Ok(users)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
