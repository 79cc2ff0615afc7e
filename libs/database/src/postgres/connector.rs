use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::{PostgresConfig, check_health};
use crate::common::{DatabaseError, retry_with_backoff};

/// Build the pool without opening a connection
///
/// Only a malformed URL fails here; an unreachable server shows up on the
/// first query, so the process can start and report through `/ready`.
pub async fn connect_lazy(config: &PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = config.connect_options();
    options.connect_lazy(true);
    Database::connect(options).await
}

/// Probe the pool until it answers or the retry budget is spent
pub async fn wait_until_healthy(
    db: &DatabaseConnection,
    config: &PostgresConfig,
) -> Result<(), DatabaseError> {
    retry_with_backoff(|| check_health(db), config.retry_config()).await?;
    info!("PostgreSQL is reachable");
    Ok(())
}

/// Apply pending migrations from `M`
///
/// `app_name` only labels the log lines.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}
