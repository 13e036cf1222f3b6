//! Seed command - Inserts the default role records.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{seed, Database};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding roles...");

    let db = Database::connect(&config).await?;
    seed::seed_roles(db.connection()).await?;

    db.close().await?;
    Ok(())
}
