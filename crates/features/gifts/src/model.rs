use surrealdb::types::SurrealValue;

/// A claimable gift. `reserved_by` is empty while nobody holds it and
/// `reserved_at` (epoch ms) is only set while somebody does.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct GiftRecord {
    pub key: String,
    pub name: Option<String>,
    pub reserved_by: String,
    pub reserved_at: Option<i64>,
}

impl GiftRecord {
    /// An unreserved gift.
    pub fn new(key: impl Into<String>, name: Option<String>) -> Self {
        Self { key: key.into(), name, reserved_by: String::new(), reserved_at: None }
    }

    #[must_use]
    pub fn is_reserved(&self) -> bool {
        !self.reserved_by.is_empty()
    }

    #[must_use]
    pub fn holder(&self) -> Option<&str> {
        self.is_reserved().then_some(self.reserved_by.as_str())
    }
}

/// The holder written by a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hold {
    pub by: String,
    pub at: i64,
}

/// Result of a compare-and-swap on `reserved_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The precondition held; carries the record as written.
    Applied(GiftRecord),
    Missing,
    /// The precondition failed; carries the record as found.
    Conflict(GiftRecord),
}
