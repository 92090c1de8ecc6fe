use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named, user-owned collection of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Journal {
    pub id: String,
    pub name: String,
    pub desc: Option<String>,
    /// Subject identifier of the owner. Set once at creation.
    pub user: String,
}
