/// Published after a song request is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongAdded {
    pub id: String,
    pub added_by: String,
}

/// Published after the adder withdraws a song request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRemoved {
    pub id: String,
    pub removed_by: String,
}
