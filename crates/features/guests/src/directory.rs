use crate::error::GuestError;
use crate::events::{UserProvisioned, UserRemoved};
use crate::model::{GuestName, GuestProfile, Rename, UserProfile};
use crate::names::{account_name, guest_name};
use rsvp_database::{Database, DatabaseErrorExt};
use rsvp_event_bus::EventBus;
use tracing::{info, instrument, warn};

const WRITE_USER: &str = "DELETE user WHERE key = $uid;
    CREATE user SET key = $uid, email = $email, name = $name,
        is_avec_allowed = false, is_family_allowed = false, is_admin = false,
        is_allowed_to_confirm = true, created_at = $now
    RETURN NONE;";

const WRITE_GUEST: &str = "DELETE guest WHERE key = $uid;
    CREATE guest SET key = $uid, account = $uid, name = $email,
        is_avec = false, is_family_member = false, is_coming = NONE, confirmed_at = NONE,
        created_at = $now
    RETURN NONE;";

const DELETE_USER: &str = "DELETE user WHERE key = $uid";
const DELETE_GUESTS: &str = "LET $gone = (DELETE guest WHERE account = $uid RETURN BEFORE);
RETURN array::len($gone);";

const NAMES_WITH_AT: &str = "SELECT key, name FROM guest WHERE string::contains(name, '@')";
const RENAME_BATCH: &str = "BEGIN TRANSACTION;
    FOR $rename IN $renames {
        UPDATE guest SET name = $rename.name WHERE key = $rename.key;
    };
    COMMIT TRANSACTION;";

const USER: &str = "SELECT key, email, name, is_avec_allowed, is_family_allowed, is_admin,
    is_allowed_to_confirm, created_at FROM user WHERE key = $uid LIMIT 1";
const GUESTS_OF: &str = "SELECT key, account, name, is_avec, is_family_member, is_coming,
    confirmed_at, created_at FROM guest WHERE account = $uid ORDER BY key";

/// Users and guests over `SurrealDB`.
#[derive(Debug, Clone)]
pub struct GuestDirectory {
    db: Database,
    events: EventBus,
}

impl GuestDirectory {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// Mirrors a new account: the user profile first, then its primary guest.
    ///
    /// Both writes replace any existing record with the same key.
    #[instrument(skip(self))]
    pub async fn provision(&self, uid: &str, email: &str) -> Result<UserProfile, GuestError> {
        let uid = required(uid, "uid is required")?;
        let email = required(email, "email is required")?;
        let now = chrono::Utc::now().timestamp_millis();

        self.db
            .query(WRITE_USER)
            .bind(("uid", uid.to_owned()))
            .bind(("email", email.to_owned()))
            .bind(("name", account_name(email)))
            .bind(("now", now))
            .await
            .context("Writing user profile")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Writing user profile")?;
        info!(uid, "User added");

        self.db
            .query(WRITE_GUEST)
            .bind(("uid", uid.to_owned()))
            .bind(("email", email.to_owned()))
            .bind(("now", now))
            .await
            .context("Writing guest profile")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Writing guest profile")?;
        info!(uid, "Guest added");

        self.publish(UserProvisioned { uid: uid.to_owned(), email: email.to_owned() });

        self.user(uid).await?.ok_or_else(|| GuestError::Internal {
            message: "User profile missing after write".into(),
            context: Some(uid.to_owned().into()),
        })
    }

    /// Deletes an account and every guest it owns. Returns the number of guests removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, uid: &str) -> Result<usize, GuestError> {
        let uid = required(uid, "uid is required")?;

        self.db
            .query(DELETE_USER)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Deleting user profile")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Deleting user profile")?;
        info!(uid, "User deleted");

        let deleted = self
            .db
            .query(DELETE_GUESTS)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Deleting guests")?
            .take::<Option<i64>>(1)
            .context("Counting deleted guests")?
            .unwrap_or_default();
        let removed = usize::try_from(deleted).unwrap_or_default();
        info!(uid, count = removed, "Guests deleted");

        self.publish(UserRemoved { uid: uid.to_owned(), removed_guests: removed });
        Ok(removed)
    }

    /// Turns e-mail shaped guest names into `First Last` in one transaction.
    /// Returns the number of guests renamed.
    #[instrument(skip(self))]
    pub async fn rename_guests(&self) -> Result<usize, GuestError> {
        let candidates = self
            .db
            .query(NAMES_WITH_AT)
            .await
            .context("Loading guest names")?
            .take::<Vec<GuestName>>(0)
            .context("Decoding guest names")?;

        let renames: Vec<Rename> = candidates
            .into_iter()
            .filter_map(|guest| guest_name(&guest.name).map(|name| Rename { key: guest.key, name }))
            .collect();

        if renames.is_empty() {
            return Ok(0);
        }
        let count = renames.len();

        self.db
            .query(RENAME_BATCH)
            .bind(("renames", renames))
            .await
            .context("Renaming guests")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Renaming guests")?;
        info!(count, "Guests renamed");

        Ok(count)
    }

    pub async fn user(&self, uid: &str) -> Result<Option<UserProfile>, GuestError> {
        let mut users = self
            .db
            .query(USER)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading user")?
            .take::<Vec<UserProfile>>(0)
            .context("Decoding user")?;
        Ok(users.pop())
    }

    pub async fn guests_of(&self, uid: &str) -> Result<Vec<GuestProfile>, GuestError> {
        let guests = self
            .db
            .query(GUESTS_OF)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading guests")?
            .take::<Vec<GuestProfile>>(0)
            .context("Decoding guests")?;
        Ok(guests)
    }

    fn publish<T: Send + Sync + 'static>(&self, event: T) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish guest event");
        }
    }
}

fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, GuestError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GuestError::InvalidArgument { message: message.into(), context: None });
    }
    Ok(value)
}
