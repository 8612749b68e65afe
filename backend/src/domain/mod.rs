//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed user model and the use-cases around it
//! without depending on HTTP or the document store driver.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: error payload shared by all adapters.
//! - `User`, `UserId`, `PersonName`, `NewUser`, `UserPatch`: the user model.
//! - `UserService`: implementation of the `UsersCommand` / `UsersQuery` ports.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, PersonName, User, UserId, UserPatch, UserValidationError};
pub use self::user_service::{DEFAULT_LIST_LIMIT, UserService};
