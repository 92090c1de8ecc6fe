use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Entry, Journal};

/// Pass-through CRUD over the `journal` and `entry` tables.
///
/// Lookups by identifier return `Ok(None)` when no row matches; only store
/// failures surface as errors.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get_journal(&self, journal_id: &str) -> Result<Option<Journal>, DatabaseError> {
        let journal = sqlx::query_as::<_, Journal>(
            r#"SELECT id, name, "desc", "user" FROM journal WHERE id = ?"#,
        )
        .bind(journal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(journal)
    }

    /// All journals owned by `owner`, in store order
    pub async fn get_journals(&self, owner: &str) -> Result<Vec<Journal>, DatabaseError> {
        let journals = sqlx::query_as::<_, Journal>(
            r#"SELECT id, name, "desc", "user" FROM journal WHERE "user" = ?"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(journals)
    }

    /// All entries whose parent is `journal_id`. Empty when the journal is unknown.
    pub async fn get_entries(&self, journal_id: &str) -> Result<Vec<Entry>, DatabaseError> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT id, title, body, date, journal_id FROM entry WHERE journal_id = ?",
        )
        .bind(journal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn get_entry(&self, entry_id: &str) -> Result<Option<Entry>, DatabaseError> {
        let entry = sqlx::query_as::<_, Entry>(
            "SELECT id, title, body, date, journal_id FROM entry WHERE id = ?",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn create_journal(
        &self,
        name: &str,
        desc: Option<&str>,
        owner: &str,
    ) -> Result<Journal, DatabaseError> {
        let journal = Journal {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            desc: desc.map(str::to_string),
            user: owner.to_string(),
        };

        sqlx::query(r#"INSERT INTO journal (id, name, "desc", "user") VALUES (?, ?, ?, ?)"#)
            .bind(&journal.id)
            .bind(&journal.name)
            .bind(&journal.desc)
            .bind(&journal.user)
            .execute(&self.pool)
            .await?;

        tracing::debug!(journal_id = %journal.id, owner = %journal.user, "Created journal");
        Ok(journal)
    }

    /// Insert an entry stamped with the current UTC time.
    ///
    /// The parent is only checked by the store's foreign-key constraint.
    pub async fn create_entry(
        &self,
        journal_id: &str,
        title: Option<&str>,
        body: &str,
    ) -> Result<Entry, DatabaseError> {
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            title: title.map(str::to_string),
            body: body.to_string(),
            date: Utc::now(),
            journal_id: journal_id.to_string(),
        };

        sqlx::query("INSERT INTO entry (id, title, body, date, journal_id) VALUES (?, ?, ?, ?, ?)")
            .bind(&entry.id)
            .bind(&entry.title)
            .bind(&entry.body)
            .bind(entry.date)
            .bind(&entry.journal_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(entry_id = %entry.id, journal_id = %entry.journal_id, "Created entry");
        Ok(entry)
    }
}
