//! # Songs
//!
//! Song requests for the party playlist. Any signed-in guest can add one;
//! only the guest who added a song can take it off the list.

mod api;
mod book;
mod error;
mod events;
mod model;

pub use api::{AddSongRequest, SongReply, SongRequest, router};
pub use book::SongBook;
pub use error::{SongError, SongErrorExt};
pub use events::{SongAdded, SongRemoved};
pub use model::SongRecord;

use rsvp_database::{Database, Migration};
use rsvp_event_bus::EventBus;
use rsvp_kernel::domain::registry::InitializedSlice;

/// Songs feature state.
#[rsvp_derive::rsvp_slice]
pub struct Songs {
    pub book: SongBook,
}

#[must_use]
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new("songs", "0001", include_str!("../migrations/0001_song.surql"))]
}

pub fn init(database: &Database, events: &EventBus) -> Result<InitializedSlice, SongError> {
    let book = SongBook::new(database.clone(), events.clone());
    tracing::info!("Songs slice initialized");
    Ok(InitializedSlice::new(Songs::new(SongsInner { book })))
}
