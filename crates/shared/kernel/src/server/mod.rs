//! HTTP building blocks shared by the slices.

mod health;
mod identity;
mod reply;
pub mod router;
mod state;

pub use identity::{Caller, CallerClaims, IdentityError, IdentityErrorExt, ServiceKey, issue_token};
pub use reply::{MessageReply, Payload, Reply, ReplyKind};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
