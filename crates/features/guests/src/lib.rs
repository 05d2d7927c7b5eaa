//! # Guests
//!
//! Keeps the guest list in step with accounts: a new account gets a user
//! profile plus a primary guest, a deleted account takes all of its guests
//! with it. Also hosts the one-off guest rename maintenance task.

mod api;
mod directory;
mod error;
mod events;
mod model;
pub mod names;

pub use api::{AccountReply, ProvisionRequest, RenameReply, router};
pub use directory::GuestDirectory;
pub use error::{GuestError, GuestErrorExt};
pub use events::{UserProvisioned, UserRemoved};
pub use model::{GuestProfile, UserProfile};

use rsvp_database::{Database, Migration};
use rsvp_event_bus::EventBus;
use rsvp_kernel::domain::registry::InitializedSlice;

/// Guests feature state.
#[rsvp_derive::rsvp_slice]
pub struct Guests {
    pub directory: GuestDirectory,
}

#[must_use]
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new("guests", "0001", include_str!("../migrations/0001_user_guest.surql"))]
}

pub fn init(database: &Database, events: &EventBus) -> Result<InitializedSlice, GuestError> {
    let directory = GuestDirectory::new(database.clone(), events.clone());
    tracing::info!("Guests slice initialized");
    Ok(InitializedSlice::new(Guests::new(GuestsInner { directory })))
}
