//! Facade crate for the RSVP feature slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice initialization.
//! Keep this crate thin: it composes other crates, it does not implement business logic.
//!
//! ## Usage
//! - Open the database with [`migrations`] so every slice's schema is applied.
//! - Call [`init`] to build the slices, then register them into the `ApiState`.
//! - Merge [`server::router::api_router`] into the application router.

use rsvp_database::{Database, Migration};
pub use rsvp_domain as domain;
use rsvp_domain::config::ApiConfig;
use rsvp_event_bus::EventBus;
pub use rsvp_kernel as kernel;

pub mod server {
    pub mod router {
        use rsvp_kernel::server::ApiState;
        pub use rsvp_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// System routes plus every slice's routes.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            system_router()
                .merge(crate::features::gifts::router())
                .merge(crate::features::guests::router())
                .merge(crate::features::songs::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use rsvp_gifts as gifts;
    pub use rsvp_guests as guests;
    pub use rsvp_songs as songs;

    pub const ENABLED: &[&str] = &["gifts", "guests", "songs"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema scripts of every slice, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    let mut migrations = features::gifts::migrations();
    migrations.extend(features::guests::migrations());
    migrations.extend(features::songs::migrations());
    migrations
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any slice initialization fails.
pub fn init(
    _config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let slices = vec![
        features::gifts::init(database, events)?,
        features::guests::init(database, events)?,
        features::songs::init(database, events)?,
    ];

    Ok(slices)
}
