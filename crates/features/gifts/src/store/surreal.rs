use super::GiftStore;
use crate::error::GiftError;
use crate::model::{GiftRecord, Hold, SwapOutcome};
use rsvp_database::{Database, DatabaseErrorExt};
use tracing::{debug, instrument};

const FETCH: &str = "SELECT key, name, reserved_by, reserved_at FROM gift WHERE key = $key LIMIT 1";

// One statement: the WHERE clause is evaluated inside the write, so a
// concurrent holder change makes this update match nothing or fail at commit.
const SWAP: &str = "UPDATE gift SET reserved_by = $next_by, reserved_at = $next_at
    WHERE key = $key AND (reserved_by ?? '') = $expected
    RETURN key, name, reserved_by, reserved_at";

const INSERT: &str = "CREATE gift SET key = $key, name = $name, reserved_by = $reserved_by,
    reserved_at = $reserved_at RETURN NONE";

const LIST: &str = "SELECT key, name, reserved_by, reserved_at FROM gift ORDER BY key";

/// `SurrealDB`-backed gift store.
#[derive(Debug, Clone)]
pub struct SurrealGiftStore {
    db: Database,
}

impl SurrealGiftStore {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl GiftStore for SurrealGiftStore {
    #[instrument(skip(self))]
    async fn fetch(&self, key: &str) -> Result<Option<GiftRecord>, GiftError> {
        let mut records = self
            .db
            .query(FETCH)
            .bind(("key", key.to_owned()))
            .await
            .context("Fetching gift")?
            .take::<Vec<GiftRecord>>(0)
            .context("Decoding gift")?;
        Ok(records.pop())
    }

    #[instrument(skip(self, next), fields(next = next.as_ref().map(|h| h.by.as_str())))]
    async fn swap_holder(
        &self,
        key: &str,
        expected: &str,
        next: Option<Hold>,
    ) -> Result<SwapOutcome, GiftError> {
        let (next_by, next_at) = next.map_or((String::new(), None), |h| (h.by, Some(h.at)));

        let swapped = self
            .db
            .query(SWAP)
            .bind(("key", key.to_owned()))
            .bind(("expected", expected.to_owned()))
            .bind(("next_by", next_by))
            .bind(("next_at", next_at))
            .await
            .context("Swapping gift holder")
            .and_then(|mut response| {
                response.take::<Vec<GiftRecord>>(0).context("Decoding swapped gift")
            });

        let failure = match swapped {
            Ok(mut updated) => match updated.pop() {
                Some(record) => return Ok(SwapOutcome::Applied(record)),
                None => None,
            },
            Err(err) => Some(err),
        };

        // A concurrent swap that committed first fails this transaction; once
        // the holder no longer matches, the caller lost the race.
        Ok(match (self.fetch(key).await?, failure) {
            (None, _) => SwapOutcome::Missing,
            (Some(current), None) => SwapOutcome::Conflict(current),
            (Some(current), Some(err)) if current.reserved_by != expected => {
                debug!(gift = key, error = %err, "Swap lost to a concurrent writer");
                SwapOutcome::Conflict(current)
            },
            (Some(_), Some(err)) => return Err(err.into()),
        })
    }

    #[instrument(skip(self, record), fields(key = %record.key))]
    async fn insert(&self, record: GiftRecord) -> Result<(), GiftError> {
        self.db
            .query(INSERT)
            .bind(("key", record.key))
            .bind(("name", record.name))
            .bind(("reserved_by", record.reserved_by))
            .bind(("reserved_at", record.reserved_at))
            .await
            .context("Seeding gift")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Seeding gift")?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<GiftRecord>, GiftError> {
        let records = self
            .db
            .query(LIST)
            .await
            .context("Listing gifts")?
            .take::<Vec<GiftRecord>>(0)
            .context("Decoding gifts")?;
        Ok(records)
    }
}
