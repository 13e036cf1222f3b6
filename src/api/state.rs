//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::{Config, Environment};
use crate::infra::{Database, UserRepository, UserStore};
use crate::services::{UserManager, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection, absent when running over another store
    pub database: Option<Arc<Database>>,
    /// Runtime environment (controls server error logging)
    pub environment: Environment,
}

impl AppState {
    /// Wire the SeaORM-backed service over an open database.
    pub fn from_database(database: Arc<Database>, config: &Config) -> Self {
        let repo: Arc<dyn UserRepository> = Arc::new(UserStore::new(database.get_connection()));
        let user_service = Arc::new(UserManager::new(repo));

        Self {
            user_service,
            database: Some(database),
            environment: config.environment,
        }
    }

    /// Create state with a manually injected service.
    pub fn new(user_service: Arc<dyn UserService>, environment: Environment) -> Self {
        Self {
            user_service,
            database: None,
            environment,
        }
    }
}
