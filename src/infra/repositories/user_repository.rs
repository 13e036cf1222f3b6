//! User repository abstraction and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Callers are responsible for the email uniqueness pre-check; an email
/// collision that still reaches storage surfaces as `UserAlreadyExists`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new record under a freshly generated id
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// All stored records, order not guaranteed
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Merge the provided fields into an existing record
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Delete a record, returning it, or `None` if nothing was removed
    async fn remove(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique index violations mean another writer won the email race.
fn conflict_or_db(err: DbErr) -> AppError {
    let sql_err = err.sql_err();
    classify_write_error(err, sql_err)
}

// `sql_err` only recognises driver errors, which `MockDatabase` cannot build
fn classify_write_error(err: DbErr, sql_err: Option<SqlErr>) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UserAlreadyExists,
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
        };

        let model = active_model.insert(&self.db).await.map_err(conflict_or_db)?;
        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find().all(&self.db).await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        if changes.is_empty() {
            return Ok(User::from(existing));
        }

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }

        let model = active.update(&self.db).await.map_err(conflict_or_db)?;
        Ok(User::from(model))
    }

    async fn remove(&self, id: Uuid) -> AppResult<Option<User>> {
        let Some(existing) = UserEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            tracing::warn!(user_id = %id, "User vanished before delete");
            return Ok(None);
        }

        Ok(Some(User::from(existing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: Uuid, email: &str) -> user::Model {
        user::Model {
            id,
            name: "John Doe".to_string(),
            email: email.to_string(),
            password_hash: "hashed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_model() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id, "johndoe@email.com")]])
            .into_connection();

        let user = UserStore::new(db).find_by_id(id).await.unwrap().unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.email, "johndoe@email.com");
        assert_eq!(user.password_hash, "hashed");
    }

    #[tokio::test]
    async fn test_find_by_email_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let user = UserStore::new(db)
            .find_by_email("nobody@email.com")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_create_returns_stored_record() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id, "johndoe@email.com")]])
            .into_connection();

        let created = UserStore::new(db)
            .create(NewUser {
                name: "John Doe".to_string(),
                email: "johndoe@email.com".to_string(),
                password_hash: "hashed".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, id);
        assert_eq!(created.name, "John Doe");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = UserStore::new(db)
            .update(
                Uuid::new_v4(),
                UserChanges {
                    name: Some("Vasco".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_update_applies_changes() {
        let id = Uuid::new_v4();
        let mut updated = model(id, "vasco@email.com");
        updated.name = "Vasco".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id, "johndoe@email.com")], vec![updated]])
            .into_connection();

        let user = UserStore::new(db)
            .update(
                id,
                UserChanges {
                    name: Some("Vasco".to_string()),
                    email: Some("vasco@email.com".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.name, "Vasco");
        assert_eq!(user.email, "vasco@email.com");
        assert_eq!(user.password_hash, "hashed");
    }

    #[tokio::test]
    async fn test_remove_returns_deleted_record() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id, "johndoe@email.com")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let removed = UserStore::new(db).remove(id).await.unwrap();
        assert_eq!(removed.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn test_remove_reports_lost_race() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id, "johndoe@email.com")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        assert!(UserStore::new(db).remove(id).await.unwrap().is_none());
    }

    #[test]
    fn test_non_constraint_errors_stay_database_errors() {
        let err = conflict_or_db(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = classify_write_error(
            DbErr::Custom("duplicate key".to_string()),
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"idx_users_email\"".to_string(),
            )),
        );
        assert!(matches!(err, AppError::UserAlreadyExists));
    }

    #[test]
    fn test_other_constraint_violations_stay_database_errors() {
        let err = classify_write_error(
            DbErr::Custom("fk".to_string()),
            Some(SqlErr::ForeignKeyConstraintViolation("fk".to_string())),
        );
        assert!(matches!(err, AppError::Database(_)));
    }
}
