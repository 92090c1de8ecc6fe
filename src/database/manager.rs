use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the data access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_JOURNAL: &str = r#"
    CREATE TABLE IF NOT EXISTS journal (
        id   TEXT(36) PRIMARY KEY NOT NULL UNIQUE,
        name VARCHAR(80) NOT NULL,
        "desc" VARCHAR(280),
        "user" VARCHAR(280) NOT NULL
    )
"#;

const CREATE_ENTRY: &str = r#"
    CREATE TABLE IF NOT EXISTS entry (
        id         TEXT(36) PRIMARY KEY NOT NULL UNIQUE,
        title      VARCHAR(80),
        body       TEXT NOT NULL,
        date       DATETIME,
        journal_id TEXT NOT NULL REFERENCES journal (id)
    )
"#;

const CREATE_ENTRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS entry_journal_id ON entry (journal_id)";

const CREATE_JOURNAL_INDEX: &str = "CREATE INDEX IF NOT EXISTS journal_user ON journal (\"user\")";

/// Owns pool construction and schema lifecycle for the single-file store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open (creating if missing) the SQLite database named by the config
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl(config.url.clone()))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(url = %config.url, "Opened database pool");
        Ok(pool)
    }

    /// Create the `journal` and `entry` tables when they do not exist yet
    pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        for statement in [CREATE_JOURNAL, CREATE_ENTRY, CREATE_JOURNAL_INDEX, CREATE_ENTRY_INDEX] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Database schema initialized");
        Ok(())
    }

    /// Drop every application table. Destroys all journals and entries.
    pub async fn drop_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        // Children first so the foreign key never dangles mid-transaction
        sqlx::query("DROP TABLE IF EXISTS entry").execute(&mut *tx).await?;
        sqlx::query("DROP TABLE IF EXISTS journal").execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Database schema dropped");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
