use super::GiftStore;
use crate::error::GiftError;
use crate::model::{GiftRecord, Hold, SwapOutcome};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Process-local store. The map lock makes every swap atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryGiftStore {
    records: Arc<Mutex<FxHashMap<String, GiftRecord>>>,
}

impl MemoryGiftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with unreserved gifts.
    pub fn with_gifts<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let records = keys
            .into_iter()
            .map(|key| {
                let record = GiftRecord::new(key, None);
                (record.key.clone(), record)
            })
            .collect();
        Self { records: Arc::new(Mutex::new(records)) }
    }
}

impl GiftStore for MemoryGiftStore {
    async fn fetch(&self, key: &str) -> Result<Option<GiftRecord>, GiftError> {
        Ok(self.records.lock().get(key).cloned())
    }

    async fn swap_holder(
        &self,
        key: &str,
        expected: &str,
        next: Option<Hold>,
    ) -> Result<SwapOutcome, GiftError> {
        let mut records = self.records.lock();
        let Some(record) = records.get_mut(key) else {
            return Ok(SwapOutcome::Missing);
        };
        if record.reserved_by != expected {
            return Ok(SwapOutcome::Conflict(record.clone()));
        }

        match next {
            Some(Hold { by, at }) => {
                record.reserved_by = by;
                record.reserved_at = Some(at);
            },
            None => {
                record.reserved_by.clear();
                record.reserved_at = None;
            },
        }
        Ok(SwapOutcome::Applied(record.clone()))
    }

    async fn insert(&self, record: GiftRecord) -> Result<(), GiftError> {
        let mut records = self.records.lock();
        if records.contains_key(&record.key) {
            return Err(GiftError::Internal {
                message: format!("Gift {} already exists", record.key).into(),
                context: Some("Seeding gift".into()),
            });
        }
        records.insert(record.key.clone(), record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GiftRecord>, GiftError> {
        let mut records: Vec<_> = self.records.lock().values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }
}
