//! Test utilities for database operations.
//!
//! Helpers for setting up a migrated `PostgreSQL` test database and seeding
//! users and prompts into it.

use std::sync::Arc;

use chrono::Utc;
use promptvault_common::IdGenerator;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{prompt, user};
use crate::migrations::Migrator;

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER")
                .unwrap_or_else(|_| "promptvault_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "promptvault_test".to_string()),
            database: std::env::var("TEST_DB_NAME")
                .unwrap_or_else(|_| "promptvault_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    /// Get URL for connecting to postgres database (for creating test DB).
    #[must_use]
    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/postgres",
            self.username, self.password, self.host, self.port
        )
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
    id_gen: IdGenerator,
}

impl TestDatabase {
    /// Connect to the configured test database and run migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and run migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
            id_gen: IdGenerator::new(),
        })
    }

    /// Create a uniquely named, migrated database (for parallel tests).
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let unique_suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("promptvault_test_{}", &unique_suffix[..8]);

        let postgres_conn = Database::connect(&config.postgres_url()).await?;
        let create_db = format!("CREATE DATABASE \"{}\"", config.database);
        postgres_conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, create_db))
            .await?;
        postgres_conn.close().await?;

        info!(database = %config.database, "Created unique test database");

        Self::with_config(config).await
    }

    /// Get a shared handle to the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Truncate every application table.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        self.conn
            .as_ref()
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                "TRUNCATE TABLE \"vote\", \"prompt_tag\", \"tag\", \"prompt\", \"user\" CASCADE"
                    .to_string(),
            ))
            .await?;

        info!("Cleaned up test database");
        Ok(())
    }

    /// Drop the database (for databases made by [`Self::create_unique`]).
    ///
    /// Repositories may still hold the pool; `WITH (FORCE)` terminates
    /// whatever sessions remain.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        if let Ok(conn) = Arc::try_unwrap(self.conn) {
            conn.close().await?;
        }

        let postgres_conn = Database::connect(&self.config.postgres_url()).await?;
        let drop_db = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.config.database);
        postgres_conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, drop_db))
            .await?;
        postgres_conn.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }

    /// Insert a user with a fresh bearer token.
    pub async fn seed_user(&self, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            email: Set(None),
            token: Set(Some(self.id_gen.generate_token())),
            is_admin: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a prompt with zeroed counters.
    pub async fn seed_prompt(
        &self,
        owner: &user::Model,
        title: &str,
        is_public: bool,
    ) -> Result<prompt::Model, DbErr> {
        let now = Utc::now();
        prompt::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id.clone()),
            title: Set(title.to_string()),
            prompt_text: Set(format!("{title} text")),
            is_public: Set(is_public),
            upvotes: Set(0),
            downvotes: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.conn.as_ref())
        .await
    }
}
