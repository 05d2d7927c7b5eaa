//! Common imports for feature slices.

pub use crate::domain::config::ApiConfig;
pub use crate::domain::constants::*;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::safe_nanoid;
pub use crate::security::resource::{ResourceGuard, ResourceGuardError};
#[cfg(feature = "server")]
pub use crate::server::{
    ApiState, ApiStateError, Caller, MessageReply, Payload, Reply, ReplyKind, ServiceKey,
};
#[cfg(feature = "server")]
pub use rsvp_database::{Database, DatabaseError, Migration};
#[cfg(feature = "server")]
pub use rsvp_event_bus::EventBus;
pub use rsvp_derive::{api_handler, api_model};
