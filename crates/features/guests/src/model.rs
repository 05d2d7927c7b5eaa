use surrealdb::types::SurrealValue;

/// Account profile mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct UserProfile {
    pub key: String,
    pub email: String,
    pub name: String,
    pub is_avec_allowed: bool,
    pub is_family_allowed: bool,
    pub is_admin: bool,
    pub is_allowed_to_confirm: bool,
    pub created_at: i64,
}

/// A person on the guest list; the primary guest of an account shares its key.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct GuestProfile {
    pub key: String,
    pub account: String,
    pub name: String,
    pub is_avec: bool,
    pub is_family_member: bool,
    pub is_coming: Option<bool>,
    pub confirmed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct Rename {
    pub key: String,
    pub name: String,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct GuestName {
    pub key: String,
    pub name: String,
}
