//! Activity log: turns slice events into log lines.

use rsvp::features::gifts::{ReservationAction, ReservationChanged};
use rsvp::features::guests::{UserProvisioned, UserRemoved};
use rsvp::features::songs::{SongAdded, SongRemoved};
use rsvp_event_bus::{Event, EventBus, EventBusError, EventReceiverExt};
use tokio::task::JoinHandle;
use tracing::info;

/// Subscribes to every slice event and spawns one logging task per event type.
///
/// Each task ends when the bus shuts down.
pub(crate) fn spawn(events: &EventBus) -> Result<Vec<JoinHandle<()>>, EventBusError> {
    Ok(vec![
        follow::<ReservationChanged>(events, |e| {
            let action = match e.action {
                ReservationAction::Claimed => "claimed",
                ReservationAction::Released => "released",
            };
            info!(target: "rsvp::activity", gift = %e.gift_id, caller = %e.caller, action, "Reservation changed");
        })?,
        follow::<UserProvisioned>(events, |e| {
            info!(target: "rsvp::activity", uid = %e.uid, "User provisioned");
        })?,
        follow::<UserRemoved>(events, |e| {
            info!(target: "rsvp::activity", uid = %e.uid, guests = e.removed_guests, "User removed");
        })?,
        follow::<SongAdded>(events, |e| {
            info!(target: "rsvp::activity", song = %e.id, by = %e.added_by, "Song added");
        })?,
        follow::<SongRemoved>(events, |e| {
            info!(target: "rsvp::activity", song = %e.id, by = %e.removed_by, "Song removed");
        })?,
    ])
}

fn follow<T: Event>(
    events: &EventBus,
    log: impl Fn(&T) + Send + 'static,
) -> Result<JoinHandle<()>, EventBusError> {
    let mut rx = events.subscribe::<T>()?;
    Ok(tokio::spawn(async move {
        while let Some(event) = rx.next_event().await {
            log(&event);
        }
    }))
}
