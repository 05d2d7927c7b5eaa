use std::borrow::Cow;

/// Errors returned by [`EventBus`](crate::EventBus) operations.
#[rsvp_derive::rsvp_error]
pub enum EventBusError {
    /// The stored sender could not be downcast to the requested event type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The event type is already registered with another channel kind.
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    ChannelKindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The queue receiver for this event type was already handed out.
    #[error("Receiver already taken{}: {message}", format_context(.context))]
    ReceiverTaken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A bounded queue is full or its receiver is gone.
    #[error("Channel full{}: {message}", format_context(.context))]
    ChannelFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Bounded channels need a capacity of at least one.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
