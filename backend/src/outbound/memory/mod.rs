//! In-process adapters used by tests and by `--in-memory` runs.

mod user_repository;

pub use user_repository::InMemoryUserRepository;
