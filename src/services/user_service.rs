//! User service - Handles user-related business logic.
//!
//! Owns the email uniqueness rule, password hashing and the translation
//! from stored records to `UserResponse`.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateUser, NewUser, Password, UpdateUser, UserChanges, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new account; fails with `UserAlreadyExists` if the email is taken
    async fn create_user(&self, input: CreateUser) -> AppResult<UserResponse>;

    /// All accounts, in repository order
    async fn list_users(&self) -> AppResult<Vec<UserResponse>>;

    /// Get account by ID
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<UserResponse>;

    /// Apply a partial update
    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<UserResponse>;

    /// Delete an account; `false` if the record disappeared before the delete landed
    async fn remove_user(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of UserService over any repository.
pub struct UserManager<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserManager<R> {
    /// Create new user service instance
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserService for UserManager<R> {
    async fn create_user(&self, input: CreateUser) -> AppResult<UserResponse> {
        // Check-then-act: the unique index on email backs this up under races
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        let password_hash = Password::new_blocking(input.password).await?.into_string();

        let user = self
            .repo
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(UserResponse::from(user))
    }

    async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.repo.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<UserResponse> {
        self.repo
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_not_found()
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<UserResponse> {
        self.repo.find_by_id(id).await?.ok_or_not_found()?;

        if let Some(email) = &input.email {
            if let Some(owner) = self.repo.find_by_email(email).await? {
                if owner.id != id {
                    return Err(AppError::UserAlreadyExists);
                }
            }
        }

        let password_hash = match input.password {
            Some(plain) => Some(Password::new_blocking(plain).await?.into_string()),
            None => None,
        };

        let user = self
            .repo
            .update(
                id,
                UserChanges {
                    name: input.name,
                    email: input.email,
                    password_hash,
                },
            )
            .await?;

        tracing::info!(user_id = %id, "User updated");
        Ok(UserResponse::from(user))
    }

    async fn remove_user(&self, id: Uuid) -> AppResult<bool> {
        self.repo.find_by_id(id).await?.ok_or_not_found()?;

        let removed = self.repo.remove(id).await?;

        if removed.is_none() {
            tracing::warn!(user_id = %id, "Repository removed nothing");
            return Ok(false);
        }

        tracing::info!(user_id = %id, "User removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn stored(id: Uuid) -> User {
        User::new(
            id,
            "John Doe".to_string(),
            "johndoe@email.com".to_string(),
            "hashed".to_string(),
        )
    }

    #[tokio::test]
    async fn test_remove_returns_false_when_repository_removed_nothing() {
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(|id| Ok(Some(stored(id))));
        repo.expect_remove().with(eq(id)).returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));

        assert!(!service.remove_user(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_failures_propagate() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|| Err(AppError::Database(DbErr::Custom("down".to_string()))));

        let service = UserManager::new(Arc::new(repo));

        assert!(matches!(
            service.list_users().await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_create_conflict_never_writes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored(Uuid::new_v4()))));
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(CreateUser {
                name: "John Doe".to_string(),
                email: "johndoe@email.com".to_string(),
                password: "123123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_update()
            .withf(|_, changes| changes.password_hash.is_none() && changes.email.is_none())
            .returning(|id, _| Ok(stored(id)));

        let service = UserManager::new(Arc::new(repo));
        let updated = service
            .update_user(
                id,
                UpdateUser {
                    name: Some("John Doe".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, id);
    }

    #[tokio::test]
    async fn test_create_race_loser_gets_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .withf(|new_user| new_user.password_hash.starts_with("$argon2id$"))
            .returning(|_| Err(AppError::UserAlreadyExists));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(CreateUser {
                name: "John Doe".to_string(),
                email: "johndoe@email.com".to_string(),
                password: "123123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
    }
}
