//! User data model.
//!
//! A stored user is an identifier plus two required text fields. The
//! identifier is the document store's 12-byte `ObjectId`, rendered to clients
//! as its canonical 24-character lowercase hex string.

use std::fmt;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Validation errors raised while building user components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier string was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier string is not a 24 character hex object id.
    #[error("user id must be a 24 character hexadecimal object id")]
    InvalidId,
    /// A name field was empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
}

/// Opaque user identifier.
///
/// Holds the parsed key alongside its canonical string form so handlers and
/// serialisers never re-encode it.
///
/// # Examples
/// ```
/// use user_service::domain::UserId;
///
/// let id = UserId::new("655BA3D28D4531F9E785989D").expect("valid object id");
/// assert_eq!(id.as_ref(), "655ba3d28d4531f9e785989d");
/// assert!(UserId::new("655ba3").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(ObjectId, String);

impl UserId {
    /// Parse an identifier from its external string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let object_id = ObjectId::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_object_id(object_id))
    }

    /// Generate a fresh identifier the way the document store would.
    pub fn generate() -> Self {
        Self::from_object_id(ObjectId::new())
    }

    /// Wrap a key produced by the document store.
    pub fn from_object_id(object_id: ObjectId) -> Self {
        Self(object_id, object_id.to_hex())
    }

    /// Access the underlying store key.
    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Required personal name component (used for both `name` and `surname`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and wrap a name, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored user record.
///
/// ## Invariants
/// - `id` is assigned by the store and never changes.
/// - `name` and `surname` are always present and non-blank.
///
/// Serialises as `{"id": "<hex>", "name": "...", "surname": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "UserDto")]
pub struct User {
    id: UserId,
    name: PersonName,
    surname: PersonName,
}

impl User {
    /// Build a user from validated components.
    pub fn new(id: UserId, name: PersonName, surname: PersonName) -> Self {
        Self { id, name, surname }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Given name.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Family name.
    pub fn surname(&self) -> &PersonName {
        &self.surname
    }

    /// Apply a merge-patch, overwriting only the fields it carries.
    #[must_use]
    pub fn patched(self, patch: &UserPatch) -> Self {
        let Self { id, name, surname } = self;
        Self {
            id,
            name: patch.name.clone().unwrap_or(name),
            surname: patch.surname.clone().unwrap_or(surname),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UserDto {
    id: String,
    name: String,
    surname: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            name: value.name.into(),
            surname: value.surname.into(),
        }
    }
}

/// Fields for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Given name.
    pub name: PersonName,
    /// Family name.
    pub surname: PersonName,
}

/// Merge-patch for an existing user; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement given name.
    pub name: Option<PersonName>,
    /// Replacement family name.
    pub surname: Option<PersonName>,
}

impl UserPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none()
    }
}
