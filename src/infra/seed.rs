//! Initial data provisioning.

use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::repositories::entities::role::{self, ActiveModel as RoleActiveModel, Entity as RoleEntity};
use crate::domain::Role;
use crate::errors::AppResult;

/// Insert the fixed role set, skipping names that already exist.
///
/// Returns the number of rows actually inserted.
pub async fn seed_roles(db: &DatabaseConnection) -> AppResult<u64> {
    let models = Role::ALL.iter().map(|role| RoleActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(role.as_str().to_string()),
    });

    let inserted = RoleEntity::insert_many(models)
        .on_conflict(
            OnConflict::column(role::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::info!(inserted, "Roles seeded");
    Ok(inserted)
}
