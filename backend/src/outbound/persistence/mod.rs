//! Document-store adapters.
//!
//! `MongoConnection` owns the driver handle; `MongoUserRepository`
//! implements the `UserRepository` port on top of it. Document shapes stay
//! private to this module.

mod connection;
mod documents;
mod mongo_user_repository;

pub use connection::{
    DEFAULT_DATABASE, DEFAULT_MONGODB_URI, DEFAULT_USER_COLLECTION, MongoConfig, MongoConnection,
    MongoConnectionError,
};
pub use mongo_user_repository::MongoUserRepository;
