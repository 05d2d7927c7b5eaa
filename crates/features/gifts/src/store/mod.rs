//! Storage seam for the ledger.

mod memory;
mod surreal;

pub use memory::MemoryGiftStore;
pub use surreal::SurrealGiftStore;

use crate::error::GiftError;
use crate::model::{GiftRecord, Hold, SwapOutcome};
use std::future::Future;

/// Everything the ledger needs from persistence.
///
/// `swap_holder` must be atomic per record: it writes `next` only if the
/// current `reserved_by` equals `expected` (`""` meaning unreserved) at the
/// moment of the write. `next = None` clears both holder fields.
pub trait GiftStore: Send + Sync + 'static {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Option<GiftRecord>, GiftError>> + Send;

    fn swap_holder(
        &self,
        key: &str,
        expected: &str,
        next: Option<Hold>,
    ) -> impl Future<Output = Result<SwapOutcome, GiftError>> + Send;

    /// Seeds a gift. Fails if the key already exists.
    fn insert(&self, record: GiftRecord) -> impl Future<Output = Result<(), GiftError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<GiftRecord>, GiftError>> + Send;
}
