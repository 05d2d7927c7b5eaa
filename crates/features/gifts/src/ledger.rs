use crate::error::GiftError;
use crate::events::{ReservationAction, ReservationChanged};
use crate::model::{GiftRecord, Hold, SwapOutcome};
use crate::store::GiftStore;
use rsvp_domain::constants::GIFT;
use rsvp_event_bus::EventBus;
use rsvp_kernel::security::resource::ResourceGuard;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Claim/release state machine over a [`GiftStore`].
///
/// `Unreserved --claim(uid)--> Reserved(uid) --release(uid)--> Unreserved`.
/// Every transition is a single conditional write, so concurrent claims on
/// one gift produce exactly one winner.
#[derive(Debug, Clone)]
pub struct ReservationLedger<S> {
    store: S,
    events: EventBus,
}

impl<S: GiftStore> ReservationLedger<S> {
    pub const fn new(store: S, events: EventBus) -> Self {
        Self { store, events }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Reserves `gift_id` for `caller`.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidArgument`, `NotFound`, `AlreadyReserved` or a
    /// store failure.
    #[instrument(skip(self))]
    pub async fn claim(&self, caller: &str, gift_id: &str) -> Result<GiftRecord, GiftError> {
        let key = preconditions(caller, gift_id)?;
        let hold = Hold { by: caller.to_owned(), at: chrono::Utc::now().timestamp_millis() };

        match self.store.swap_holder(&key, "", Some(hold)).await? {
            SwapOutcome::Applied(record) => {
                info!(gift = %key, caller, "Gift reserved");
                self.announce(&key, caller, ReservationAction::Claimed);
                Ok(record)
            },
            SwapOutcome::Missing => Err(GiftError::NotFound { gift_id: key, context: None }),
            SwapOutcome::Conflict(current) => {
                warn!(gift = %key, caller, holder = %current.reserved_by, "Gift already reserved");
                Err(GiftError::AlreadyReserved { gift_id: key, context: None })
            },
        }
    }

    /// Clears the reservation `caller` holds on `gift_id`.
    ///
    /// There is no override: releasing a gift held by someone else, or not
    /// held at all, is `NotOwner`.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidArgument`, `NotFound`, `NotOwner` or a store failure.
    #[instrument(skip(self))]
    pub async fn release(&self, caller: &str, gift_id: &str) -> Result<GiftRecord, GiftError> {
        let key = preconditions(caller, gift_id)?;

        match self.store.swap_holder(&key, caller, None).await? {
            SwapOutcome::Applied(record) => {
                info!(gift = %key, caller, "Gift reservation released");
                self.announce(&key, caller, ReservationAction::Released);
                Ok(record)
            },
            SwapOutcome::Missing => Err(GiftError::NotFound { gift_id: key, context: None }),
            SwapOutcome::Conflict(current) => {
                warn!(
                    gift = %key,
                    caller,
                    holder = %current.reserved_by,
                    "Release attempted by someone other than the holder"
                );
                Err(GiftError::NotOwner { gift_id: key, context: None })
            },
        }
    }

    /// Number of reserved gifts per holder.
    ///
    /// # Errors
    /// Store failures.
    #[instrument(skip(self))]
    pub async fn report(&self) -> Result<BTreeMap<String, u64>, GiftError> {
        let mut counts = BTreeMap::new();
        for record in self.store.list().await? {
            if let Some(holder) = record.holder() {
                *counts.entry(holder.to_owned()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Adds an unreserved gift to the store.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty key; store failures, including a duplicate key.
    pub async fn seed(&self, gift_id: &str, name: Option<String>) -> Result<(), GiftError> {
        let key = gift_key(gift_id)?;
        self.store.insert(GiftRecord::new(key, name)).await
    }

    fn announce(&self, gift_id: &str, caller: &str, action: ReservationAction) {
        let event =
            ReservationChanged { gift_id: gift_id.to_owned(), caller: caller.to_owned(), action };
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish reservation event");
        }
    }
}

fn preconditions(caller: &str, gift_id: &str) -> Result<String, GiftError> {
    if caller.is_empty() {
        return Err(GiftError::Unauthorized { context: None });
    }
    gift_key(gift_id)
}

fn gift_key(gift_id: &str) -> Result<String, GiftError> {
    ResourceGuard::key(gift_id, GIFT).map_err(|_| GiftError::InvalidArgument {
        message: "giftId is required".into(),
        context: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGiftStore;

    fn ledger() -> ReservationLedger<MemoryGiftStore> {
        ReservationLedger::new(MemoryGiftStore::with_gifts(["g1", "g2"]), EventBus::new())
    }

    #[tokio::test]
    async fn anonymous_caller_is_rejected_before_lookup() {
        let err = ledger().claim("", "missing").await.unwrap_err();
        assert!(matches!(err, GiftError::Unauthorized { .. }));
        assert_eq!(err.reply_message(), "Unauthorized");
    }

    #[tokio::test]
    async fn empty_gift_id_is_invalid() {
        let err = ledger().release("alice", " ").await.unwrap_err();
        assert!(matches!(err, GiftError::InvalidArgument { .. }));
        assert_eq!(err.reply_message(), "giftId is required");
    }

    #[tokio::test]
    async fn prefixed_ids_resolve_to_the_same_gift() {
        let ledger = ledger();
        let record = ledger.claim("alice", "gift:g1").await.unwrap();
        assert_eq!(record.key, "g1");

        let err = ledger.claim("bob", "song:g1").await.unwrap_err();
        assert!(matches!(err, GiftError::NotFound { .. }));
    }

    #[tokio::test]
    async fn bare_prefix_is_a_missing_gift_id() {
        let err = ledger().claim("alice", "gift:").await.unwrap_err();
        assert!(matches!(err, GiftError::InvalidArgument { .. }));
        assert_eq!(err.reply_message(), "giftId is required");
    }

    #[tokio::test]
    async fn colon_keys_are_opaque() {
        let ledger = ledger();
        ledger.seed("wedding:toaster", None).await.unwrap();

        let record = ledger.claim("alice", "wedding:toaster").await.unwrap();
        assert_eq!(record.key, "wedding:toaster");
        let record = ledger.release("alice", "gift:wedding:toaster").await.unwrap();
        assert_eq!(record.reserved_by, "");
    }

    #[tokio::test]
    async fn claim_stamps_reservation_time() {
        let before = chrono::Utc::now().timestamp_millis();
        let record = ledger().claim("alice", "g1").await.unwrap();

        assert_eq!(record.reserved_by, "alice");
        assert!(record.reserved_at.is_some_and(|at| at >= before));
    }

    #[tokio::test]
    async fn report_counts_only_reserved_gifts() {
        let ledger = ledger();
        ledger.seed("g3", Some("Toaster".to_owned())).await.unwrap();
        ledger.claim("alice", "g1").await.unwrap();
        ledger.claim("alice", "g3").await.unwrap();

        let report = ledger.report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("alice"), Some(&2));
    }
}
