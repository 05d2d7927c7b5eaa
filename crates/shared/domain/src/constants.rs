//! Table names and OpenAPI tags.

pub const GIFT: &str = "gift";
pub const USER: &str = "user";
pub const GUEST: &str = "guest";
pub const SONG: &str = "song";

pub const GIFTS_TAG: &str = "Gifts";
pub const SONGS_TAG: &str = "Songs";
pub const HOOKS_TAG: &str = "Hooks";
pub const MAINTENANCE_TAG: &str = "Maintenance";
pub const SYSTEM_TAG: &str = "System";

/// Header carrying the shared secret for hooks and maintenance endpoints.
pub const SERVICE_KEY_HEADER: &str = "x-rsvp-service-key";

/// Reply message for every successful operation.
pub const OK: &str = "Ok";
