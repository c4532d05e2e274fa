use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Outcome of a migration run: which versions this run applied, and how
/// many migrations the schema carries in total.
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    pub newly_applied: Vec<String>,
    pub total: usize,
}

impl MigrationSummary {
    pub fn schema_was_current(&self) -> bool {
        self.newly_applied.is_empty()
    }
}

pub async fn run_pending(pool: &DbPool) -> Result<MigrationSummary, MigrateError> {
    let before = applied_versions(pool).await?;
    MIGRATOR.run(pool).await?;
    let newly_applied = MIGRATOR
        .iter()
        .filter(|migration| !before.contains(&migration.version))
        .map(|migration| format!("{:04}_{}", migration.version, migration.description))
        .collect();
    Ok(MigrationSummary { newly_applied, total: MIGRATOR.iter().count() })
}

/// Versions already recorded in the bookkeeping table. On a fresh database
/// the table does not exist yet, which reads as no versions applied.
async fn applied_versions(pool: &DbPool) -> Result<Vec<i64>, MigrateError> {
    let bookkeeping_present = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if bookkeeping_present == 0 {
        return Ok(Vec::new());
    }
    let versions = sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations")
        .fetch_all(pool)
        .await?;
    Ok(versions)
}
