//! Database layer for promptvault-rs.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use promptvault_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await.map_err(map_db_err)
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None).await.map_err(map_db_err)
}

/// Classify a database error.
///
/// Unique-constraint violations (a concurrent writer won the race) and lost
/// or unobtainable connections are transient and become
/// [`AppError::Retryable`]. Everything else is a plain database error.
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return AppError::Retryable(format!("unique constraint violated: {detail}"));
    }

    match err {
        DbErr::ConnectionAcquire(e) => AppError::Retryable(e.to_string()),
        DbErr::Conn(e) => AppError::Retryable(e.to_string()),
        other => AppError::Database(other.to_string()),
    }
}
