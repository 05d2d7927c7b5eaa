use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{trace, warn};

/// Domain events are rare (a reservation, a new account); 128 slots is plenty.
const DEFAULT_CAPACITY: usize = 128;

/// Delivery semantics registered for an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Fan-out to every live subscriber.
    Broadcast { capacity: usize },
    /// Bounded queue with a single consumer.
    Queue { capacity: usize },
}

/// Anything that can travel across the [`EventBus`].
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    kind: ChannelKind,
    slot: Box<dyn Any + Send + Sync>,
}

#[derive(Debug)]
struct QueueSlot<T> {
    sender: mpsc::Sender<Arc<T>>,
    receiver: Option<mpsc::Receiver<Arc<T>>>,
}

/// Type-indexed channel registry shared by every slice of the server.
///
/// Cloning is cheap; all clones see the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is already registered as a queue.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes with an explicit buffer size. The first registration decides the capacity.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for zero, [`EventBusError::ChannelKindMismatch`]
    /// if `T` is already registered as a queue.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes `event` to every current subscriber and returns how many received it.
    ///
    /// Publishing with no subscribers is not an error.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a queue.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Like [`EventBus::publish`] for an event that is already shared.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a queue.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(event) {
            Ok(count) => {
                trace!(event = type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Takes the single consumer end of a bounded queue for `T`.
    ///
    /// # Errors
    /// [`EventBusError::ReceiverTaken`] on the second call,
    /// [`EventBusError::ChannelKindMismatch`] if `T` is a broadcast event.
    pub fn subscribe_queue<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<mpsc::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        let mut channels = self.channels.write();
        let state = channels.entry(TypeId::of::<T>()).or_insert_with(|| new_queue::<T>(capacity));
        let slot = queue_slot::<T>(state)?;
        slot.receiver.take().ok_or_else(|| EventBusError::ReceiverTaken {
            message: type_name::<T>().into(),
            context: None,
        })
    }

    /// Enqueues `event` without waiting.
    ///
    /// # Errors
    /// [`EventBusError::ChannelFull`] when the queue is full or its consumer was dropped.
    pub fn enqueue<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let sender = {
            let mut channels = self.channels.write();
            let state = channels
                .entry(TypeId::of::<T>())
                .or_insert_with(|| new_queue::<T>(DEFAULT_CAPACITY));
            queue_slot::<T>(state)?.sender.clone()
        };
        sender.try_send(Arc::new(event)).map_err(|e| EventBusError::ChannelFull {
            message: e.to_string().into(),
            context: Some(type_name::<T>().into()),
        })
    }

    /// Drops every channel; pending receivers observe closure.
    ///
    /// Returns the number of channels that were closed.
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(state) = self.channels.read().get(&id) {
            return broadcast_from_state::<T>(state, capacity);
        }

        let mut channels = self.channels.write();
        let state = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Initializing broadcast channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            ChannelState { kind: ChannelKind::Broadcast { capacity }, slot: Box::new(tx) }
        });
        broadcast_from_state::<T>(state, capacity)
    }
}

fn new_queue<T: Event>(capacity: usize) -> ChannelState {
    trace!(event = type_name::<T>(), capacity, "Initializing queue channel");
    let (sender, receiver) = mpsc::channel::<Arc<T>>(capacity);
    ChannelState {
        kind: ChannelKind::Queue { capacity },
        slot: Box::new(QueueSlot { sender, receiver: Some(receiver) }),
    }
}

fn broadcast_from_state<T: Event>(
    state: &ChannelState,
    requested: usize,
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    let ChannelKind::Broadcast { capacity } = state.kind else {
        return Err(kind_mismatch::<T>(state.kind));
    };
    if capacity != requested && requested != DEFAULT_CAPACITY {
        warn!(
            event = type_name::<T>(),
            existing_capacity = capacity,
            requested_capacity = requested,
            "Broadcast channel already initialized with a different capacity"
        );
    }
    state.slot.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(type_mismatch::<T>)
}

fn queue_slot<T: Event>(state: &mut ChannelState) -> Result<&mut QueueSlot<T>, EventBusError> {
    if !matches!(state.kind, ChannelKind::Queue { .. }) {
        return Err(kind_mismatch::<T>(state.kind));
    }
    state.slot.downcast_mut::<QueueSlot<T>>().ok_or_else(type_mismatch::<T>)
}

fn kind_mismatch<T: Event>(found: ChannelKind) -> EventBusError {
    EventBusError::ChannelKindMismatch {
        message: format!("{} is registered as {found:?}", type_name::<T>()).into(),
        context: None,
    }
}

fn type_mismatch<T: Event>() -> EventBusError {
    EventBusError::TypeMismatch { message: type_name::<T>().into(), context: None }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity == 0 {
        return Err(EventBusError::InvalidCapacity {
            message: "capacity must be at least 1".into(),
            context: None,
        });
    }
    Ok(capacity)
}
