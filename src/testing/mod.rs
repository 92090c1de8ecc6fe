use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::database::{DatabaseManager, Repository};

/// Fresh in-memory database with the schema applied.
///
/// Limited to one connection: every SQLite `:memory:` connection is its own database.
pub async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = DatabaseManager::connect(&config).await.expect("open in-memory database");
    DatabaseManager::initialize_schema(&pool).await.expect("initialize schema");
    pool
}

pub async fn memory_repository() -> Repository {
    Repository::new(memory_pool().await)
}
