//! # Event Bus
//!
//! Typed, in-process pub/sub used by feature slices to announce what happened
//! (a gift was reserved, a user was removed) without depending on each other.
//!
//! Events are keyed by their Rust type. Two channel kinds are available:
//! broadcast (fan-out to every subscriber) and a bounded queue with a single
//! consumer.
//!
//! ```rust
//! use rsvp_event_bus::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct GiftReserved { gift_id: String }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<GiftReserved>()?;
//!
//!     bus.publish(GiftReserved { gift_id: "g1".into() })?;
//!
//!     let event = rx.next_event().await.expect("bus is open");
//!     assert_eq!(event.gift_id, "g1");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
