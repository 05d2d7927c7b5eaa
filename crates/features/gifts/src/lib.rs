//! # Gifts
//!
//! The reservation ledger: guests claim a gift so nobody else buys it, and
//! may release only what they claimed. Persistence sits behind [`GiftStore`]
//! with a `SurrealDB` implementation for the server and an in-memory one for
//! tests and local runs.

mod api;
mod error;
mod events;
mod ledger;
mod model;
mod store;

pub use api::{GiftReply, GiftRequest, router};
pub use error::{GiftError, GiftErrorExt};
pub use events::{ReservationAction, ReservationChanged};
pub use ledger::ReservationLedger;
pub use model::{GiftRecord, Hold, SwapOutcome};
pub use store::{GiftStore, MemoryGiftStore, SurrealGiftStore};

use rsvp_database::{Database, Migration};
use rsvp_event_bus::EventBus;
use rsvp_kernel::domain::registry::InitializedSlice;

/// Gifts feature state.
#[rsvp_derive::rsvp_slice]
pub struct Gifts {
    pub ledger: ReservationLedger<SurrealGiftStore>,
}

/// Schema scripts owned by this slice.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new("gifts", "0001", include_str!("../migrations/0001_gift.surql"))]
}

/// Initializes the gifts slice over the shared database and event bus.
pub fn init(database: &Database, events: &EventBus) -> Result<InitializedSlice, GiftError> {
    let ledger = ReservationLedger::new(SurrealGiftStore::new(database.clone()), events.clone());
    tracing::info!("Gifts slice initialized");
    Ok(InitializedSlice::new(Gifts::new(GiftsInner { ledger })))
}
