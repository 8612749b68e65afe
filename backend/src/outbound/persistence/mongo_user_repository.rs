//! MongoDB-backed `UserRepository`.
//!
//! Each port method is one driver call on the user collection. Updates use
//! `findOneAndUpdate` so the merge and the read-back are a single atomic
//! document operation.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ReturnDocument;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserPatch};

use super::connection::MongoConnection;
use super::documents::{NewUserDocument, UserDocument, id_filter, set_update};

/// Classify driver failures into connection and query errors.
fn map_mongo_error(error: MongoError) -> UserPersistenceError {
    debug!(error = %error, "mongodb operation failed");
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Update document for `patch`; an empty patch is a plain read.
fn update_document(patch: &UserPatch) -> Option<Document> {
    if patch.is_empty() {
        None
    } else {
        Some(set_update(patch))
    }
}

/// Repository over the `user` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a repository using the connection's configured collection.
    pub fn new(connection: &MongoConnection) -> Self {
        Self {
            collection: connection.user_collection(),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let result = self
            .collection
            .clone_with_type::<NewUserDocument>()
            .insert_one(NewUserDocument::from(user))
            .await
            .map_err(map_mongo_error)?;
        let object_id = result.inserted_id.as_object_id().ok_or_else(|| {
            UserPersistenceError::query(format!(
                "inserted id is not an object id: {}",
                result.inserted_id
            ))
        })?;

        Ok(User::new(
            UserId::from_object_id(object_id),
            user.name.clone(),
            user.surname.clone(),
        ))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.collection
            .find_one(id_filter(id))
            .await
            .map_err(map_mongo_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self, limit: usize) -> Result<Vec<User>, UserPersistenceError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let documents: Vec<UserDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .limit(limit)
            .await
            .map_err(map_mongo_error)?
            .try_collect::<Vec<_>>()
            .await
            .map_err(map_mongo_error)?;

        documents.into_iter().map(User::try_from).collect()
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let Some(update) = update_document(patch) else {
            return self.find_by_id(id).await;
        };

        self.collection
            .find_one_and_update(id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_mongo_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(map_mongo_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_all(&self) -> Result<u64, UserPersistenceError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(map_mongo_error)?;
        Ok(result.deleted_count)
    }
}
