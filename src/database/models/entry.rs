use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single timestamped note belonging to exactly one journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub title: Option<String>,
    pub body: String,
    pub date: DateTime<Utc>,
    pub journal_id: String,
}
