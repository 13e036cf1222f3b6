//! In-memory implementation of UserRepository (test double).
//!
//! Mirrors the observable contract of `UserStore`, including the unique
//! email index. Not intended for production traffic.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};

/// Vec-backed store, kept in insertion order
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record in the store verbatim, bypassing every check.
    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Snapshot of the stored records.
    pub async fn users(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::UserAlreadyExists);
        }

        let user = User::new(
            Uuid::new_v4(),
            new_user.name,
            new_user.email,
            new_user.password_hash,
        );
        users.push(user.clone());

        tracing::debug!(user_id = %user.id, "Stored user in memory");
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;

        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::UserAlreadyExists);
            }
        }

        let user = &mut users[index];
        user.apply(changes);
        Ok(user.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;

        match users.iter().position(|u| u.id == id) {
            Some(index) => Ok(Some(users.remove(index))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "John Doe".to_string(),
            email: email.to_string(),
            password_hash: "hashed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(new_user("a@x.com")).await.unwrap();
        let b = repo.create(new_user("b@x.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();
        repo.create(new_user("b@x.com")).await.unwrap();

        let emails: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn test_storage_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        let result = repo.create(new_user("a@x.com")).await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.update(Uuid::new_v4(), UserChanges::default()).await;

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_update_to_own_email_is_allowed() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("a@x.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                UserChanges {
                    email: Some("a@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("a@x.com")).await.unwrap();

        assert_eq!(repo.remove(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(repo.remove(user.id).await.unwrap(), None);
        assert!(repo.is_empty().await);
    }
}
