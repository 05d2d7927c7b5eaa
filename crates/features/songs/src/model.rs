use surrealdb::types::SurrealValue;

/// A stored song request.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct SongRecord {
    pub key: String,
    pub name: String,
    pub artist: Option<String>,
    pub added_by: String,
    pub created_at: i64,
}
