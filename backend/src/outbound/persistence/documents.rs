//! Document shapes for the `user` collection and filter builders.
//!
//! Stored layout: `{_id: ObjectId, name: string, surname: string}`. These
//! types never leave the persistence module.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UserPersistenceError;
use crate::domain::{NewUser, PersonName, User, UserId, UserPatch};

/// A stored user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct UserDocument {
    #[serde(rename = "_id")]
    pub(super) id: ObjectId,
    pub(super) name: String,
    pub(super) surname: String,
}

/// Insert payload; `_id` is left for the driver to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct NewUserDocument {
    pub(super) name: String,
    pub(super) surname: String,
}

impl From<&NewUser> for NewUserDocument {
    fn from(value: &NewUser) -> Self {
        Self {
            name: value.name.to_string(),
            surname: value.surname.to_string(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = UserPersistenceError;

    fn try_from(value: UserDocument) -> Result<Self, Self::Error> {
        let UserDocument { id, name, surname } = value;
        let invalid =
            |err| UserPersistenceError::query(format!("stored user {id} is invalid: {err}"));
        Ok(User::new(
            UserId::from_object_id(id),
            PersonName::new(name).map_err(invalid)?,
            PersonName::new(surname).map_err(invalid)?,
        ))
    }
}

/// Filter selecting one document by key.
pub(super) fn id_filter(id: &UserId) -> Document {
    doc! { "_id": *id.as_object_id() }
}

/// `$set` update for the fields a patch carries.
///
/// Callers must not pass an empty patch; the server rejects an empty `$set`.
pub(super) fn set_update(patch: &UserPatch) -> Document {
    let mut fields = Document::new();
    if let Some(name) = &patch.name {
        fields.insert("name", name.as_ref());
    }
    if let Some(surname) = &patch.surname {
        fields.insert("surname", surname.as_ref());
    }
    doc! { "$set": fields }
}
