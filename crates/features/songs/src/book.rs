use crate::error::SongError;
use crate::events::{SongAdded, SongRemoved};
use crate::model::SongRecord;
use rsvp_database::{Database, DatabaseErrorExt};
use rsvp_domain::constants::SONG;
use rsvp_event_bus::EventBus;
use rsvp_kernel::safe_nanoid;
use rsvp_kernel::security::resource::ResourceGuard;
use tracing::{info, instrument, warn};

const ADD: &str = "CREATE song SET key = $key, name = $name, artist = $artist,
    added_by = $caller, created_at = $now RETURN NONE";

const FETCH: &str =
    "SELECT key, name, artist, added_by, created_at FROM song WHERE key = $key LIMIT 1";

// The owner check runs inside the delete; a zero count means either no such
// song or someone else's.
const REMOVE: &str = "LET $gone = (DELETE song WHERE key = $key AND added_by = $caller RETURN BEFORE);
    RETURN array::len($gone);";

const LIST: &str = "SELECT key, name, artist, added_by, created_at FROM song ORDER BY created_at, key";

/// The song request list.
#[derive(Debug, Clone)]
pub struct SongBook {
    db: Database,
    events: EventBus,
}

impl SongBook {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// Stores a new request from `caller` and returns its generated id.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidArgument` for a blank name, or a store failure.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        caller: &str,
        name: &str,
        artist: Option<&str>,
    ) -> Result<String, SongError> {
        if caller.is_empty() {
            return Err(SongError::Unauthorized { context: None });
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SongError::InvalidArgument {
                message: "Song must have a name".into(),
                context: None,
            });
        }
        let artist = artist.map(str::trim).filter(|a| !a.is_empty()).map(str::to_owned);
        let key = safe_nanoid!();

        self.db
            .query(ADD)
            .bind(("key", key.clone()))
            .bind(("name", name.to_owned()))
            .bind(("artist", artist))
            .bind(("caller", caller.to_owned()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await
            .context("Adding song")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Adding song")?;
        info!(song = %key, caller, "Song added");

        self.publish(SongAdded { id: key.clone(), added_by: caller.to_owned() });
        Ok(key)
    }

    /// Deletes a request, but only for the caller who added it.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidArgument`, `NotFound`, `NotOwner` or a store failure.
    #[instrument(skip(self))]
    pub async fn remove(&self, caller: &str, id: &str) -> Result<String, SongError> {
        if caller.is_empty() {
            return Err(SongError::Unauthorized { context: None });
        }
        let key = song_key(id)?;

        let removed = self
            .db
            .query(REMOVE)
            .bind(("key", key.clone()))
            .bind(("caller", caller.to_owned()))
            .await
            .context("Removing song")?
            .take::<Option<i64>>(1)
            .context("Decoding removed count")?
            .unwrap_or_default();

        if removed > 0 {
            info!(song = %key, caller, "Song removed");
            self.publish(SongRemoved { id: key.clone(), removed_by: caller.to_owned() });
            return Ok(key);
        }

        match self.fetch(&key).await? {
            Some(song) => {
                warn!(song = %key, caller, added_by = %song.added_by, "Removal by someone other than the adder");
                Err(SongError::NotOwner { id: key, context: None })
            },
            None => Err(SongError::NotFound { id: key, context: None }),
        }
    }

    /// Every request, oldest first.
    pub async fn list(&self) -> Result<Vec<SongRecord>, SongError> {
        let songs = self
            .db
            .query(LIST)
            .await
            .context("Loading songs")?
            .take::<Vec<SongRecord>>(0)
            .context("Decoding songs")?;
        Ok(songs)
    }

    pub async fn fetch(&self, key: &str) -> Result<Option<SongRecord>, SongError> {
        let mut songs = self
            .db
            .query(FETCH)
            .bind(("key", key.to_owned()))
            .await
            .context("Fetching song")?
            .take::<Vec<SongRecord>>(0)
            .context("Decoding song")?;
        Ok(songs.pop())
    }

    fn publish<T: Send + Sync + 'static>(&self, event: T) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish song event");
        }
    }
}

fn song_key(id: &str) -> Result<String, SongError> {
    ResourceGuard::key(id, SONG)
        .map_err(|_| SongError::InvalidArgument { message: "id is required".into(), context: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_is_required() {
        let err = song_key("  ").unwrap_err();
        assert_eq!(err.reply_message(), "id is required");
    }

    #[test]
    fn song_prefix_is_stripped() {
        assert_eq!(song_key("song:abc").unwrap(), "abc");
        assert_eq!(song_key("gift:abc").unwrap(), "gift:abc");
        assert_eq!(song_key("song:").unwrap_err().reply_message(), "id is required");
    }
}
