//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and seed data
//! - Repositories (persistent and in-memory)

pub mod db;
pub mod repositories;
pub mod seed;

pub use db::{Database, Migrator};
pub use repositories::{InMemoryUserRepository, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
