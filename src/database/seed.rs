// Sample data for local testing. Never run against a real deployment.

use rand::Rng;
use tracing::info;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Journal;
use crate::database::repository::Repository;

pub const SEED_JOURNALS: usize = 5;
pub const MAX_SEED_ENTRIES: usize = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub journals: usize,
    pub entries: usize,
}

/// Drop and recreate every table, losing all data
pub async fn reset(repo: &Repository) -> Result<(), DatabaseError> {
    DatabaseManager::drop_schema(repo.pool()).await?;
    DatabaseManager::initialize_schema(repo.pool()).await
}

/// Create journals `0..5` owned by `owner`, each with a random 0-10 entries
pub async fn seed(repo: &Repository, owner: &str) -> Result<SeedSummary, DatabaseError> {
    DatabaseManager::initialize_schema(repo.pool()).await?;

    let mut summary = SeedSummary::default();
    for i in 0..SEED_JOURNALS {
        let journal = repo
            .create_journal(&i.to_string(), Some(&format!("My {} item", i)), owner)
            .await?;
        summary.journals += 1;

        let count = rand::thread_rng().gen_range(0..=MAX_SEED_ENTRIES);
        summary.entries += seed_entries(repo, &journal, count).await?;
    }

    info!(owner, journals = summary.journals, entries = summary.entries, "Seeded sample data");
    Ok(summary)
}

async fn seed_entries(repo: &Repository, journal: &Journal, count: usize) -> Result<usize, DatabaseError> {
    for k in 0..count {
        repo.create_entry(&journal.id, Some(&format!("Head {}", k + 1)), &format!("Oh man {}", k))
            .await?;
    }
    Ok(count)
}
