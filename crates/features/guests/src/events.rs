/// Published once both profiles of a new account are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProvisioned {
    pub uid: String,
    pub email: String,
}

/// Published after an account and its guests are deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRemoved {
    pub uid: String,
    pub removed_guests: usize,
}
