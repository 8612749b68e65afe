//! In-memory `UserRepository` adapter.
//!
//! Records are kept in insertion order under a sequence number, with an id
//! index beside them, so listing matches the store's creation order without
//! depending on how object ids sort.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserPatch};

#[derive(Debug, Default)]
struct Records {
    next: u64,
    rows: BTreeMap<u64, User>,
    index: HashMap<ObjectId, u64>,
}

impl Records {
    fn push(&mut self, user: User) -> Result<(), UserPersistenceError> {
        let sequence = self.next;
        self.next = sequence
            .checked_add(1)
            .ok_or_else(|| UserPersistenceError::query("in-memory user sequence exhausted"))?;
        self.index.insert(*user.id().as_object_id(), sequence);
        self.rows.insert(sequence, user);
        Ok(())
    }

    fn get(&self, id: &UserId) -> Option<&User> {
        let sequence = self.index.get(id.as_object_id())?;
        self.rows.get(sequence)
    }

    fn get_mut(&mut self, id: &UserId) -> Option<&mut User> {
        let sequence = self.index.get(id.as_object_id())?;
        self.rows.get_mut(sequence)
    }

    fn remove(&mut self, id: &UserId) -> Option<User> {
        let sequence = self.index.remove(id.as_object_id())?;
        self.rows.remove(&sequence)
    }
}

/// Mutex-guarded user collection.
///
/// # Examples
/// ```
/// use user_service::domain::ports::UserRepository;
/// use user_service::domain::{NewUser, PersonName};
/// use user_service::outbound::memory::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repository = InMemoryUserRepository::new();
/// let user = repository
///     .insert(&NewUser {
///         name: PersonName::new("mario").unwrap(),
///         surname: PersonName::new("rossi").unwrap(),
///     })
///     .await
///     .unwrap();
/// assert!(repository.find_by_id(user.id()).await.unwrap().is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    records: Mutex<Records>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Records>, UserPersistenceError> {
        self.records
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let record = User::new(UserId::generate(), user.name.clone(), user.surname.clone());
        self.records()?.push(record.clone())?;
        Ok(record)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.records()?.get(id).cloned())
    }

    async fn list(&self, limit: usize) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.records()?.rows.values().take(limit).cloned().collect())
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut records = self.records()?;
        let Some(current) = records.get_mut(id) else {
            return Ok(None);
        };
        *current = current.clone().patched(patch);
        Ok(Some(current.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.records()?.remove(id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, UserPersistenceError> {
        let mut records = self.records()?;
        let removed = u64::try_from(records.rows.len()).unwrap_or(u64::MAX);
        records.rows.clear();
        records.index.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonName;
    use rstest::{fixture, rstest};

    fn new_user(name: &str, surname: &str) -> NewUser {
        NewUser {
            name: PersonName::new(name).expect("valid name"),
            surname: PersonName::new(surname).expect("valid surname"),
        }
    }

    #[fixture]
    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_distinct_ids(repository: InMemoryUserRepository) {
        let first = repository.insert(&new_user("mario", "rossi")).await.expect("insert");
        let second = repository.insert(&new_user("mario", "rossi")).await.expect("insert");

        assert_ne!(first.id(), second.id());
    }

    #[rstest]
    #[tokio::test]
    async fn list_returns_creation_order_up_to_limit(repository: InMemoryUserRepository) {
        for index in 0..5 {
            repository
                .insert(&new_user(&format!("user{index}"), "rossi"))
                .await
                .expect("insert");
        }

        let users = repository.list(3).await.expect("list");
        let names: Vec<&str> = users.iter().map(|user| user.name().as_ref()).collect();
        assert_eq!(names, ["user0", "user1", "user2"]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_keeps_insertion_order_regardless_of_id_order(
        repository: InMemoryUserRepository,
    ) {
        let ids = [
            "ffffffffffffffffffffffff",
            "888888888888888888888888",
            "000000000000000000000001",
        ];
        for (index, id) in ids.iter().enumerate() {
            let user = User::new(
                UserId::new(id).expect("valid id"),
                PersonName::new(format!("user{index}")).expect("valid name"),
                PersonName::new("rossi").expect("valid surname"),
            );
            repository.records().expect("lock").push(user).expect("push");
        }

        let users = repository.list(10).await.expect("list");
        let listed: Vec<String> = users.iter().map(|user| user.id().to_string()).collect();
        assert_eq!(listed, ids);
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_patch_and_keeps_id(repository: InMemoryUserRepository) {
        let created = repository.insert(&new_user("mario", "rossi")).await.expect("insert");
        let patch = UserPatch {
            name: None,
            surname: Some(PersonName::new("bianchi").expect("valid surname")),
        };

        let updated = repository
            .update(created.id(), &patch)
            .await
            .expect("update")
            .expect("user present");

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.name().as_ref(), "mario");
        assert_eq!(updated.surname().as_ref(), "bianchi");
        let reloaded = repository.find_by_id(created.id()).await.expect("find");
        assert_eq!(reloaded, Some(updated));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_user_returns_none(repository: InMemoryUserRepository) {
        let outcome = repository
            .update(&UserId::generate(), &UserPatch::default())
            .await
            .expect("update");
        assert!(outcome.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_presence(repository: InMemoryUserRepository) {
        let created = repository.insert(&new_user("mario", "rossi")).await.expect("insert");

        assert!(repository.delete(created.id()).await.expect("delete"));
        assert!(!repository.delete(created.id()).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_all_empties_the_store(repository: InMemoryUserRepository) {
        for _ in 0..3 {
            repository.insert(&new_user("mario", "rossi")).await.expect("insert");
        }

        assert_eq!(repository.delete_all().await.expect("delete all"), 3);
        assert!(repository.list(100).await.expect("list").is_empty());
    }
}
