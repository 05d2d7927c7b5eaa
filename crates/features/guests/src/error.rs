use rsvp_database::DatabaseError;
use rsvp_kernel::server::ReplyKind;
use std::borrow::Cow;

#[rsvp_derive::rsvp_error]
pub enum GuestError {
    #[error("{message}{}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Guest store error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal guest error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GuestError {
    #[must_use]
    pub fn reply_message(&self) -> Cow<'static, str> {
        match self {
            Self::InvalidArgument { message, .. } | Self::Internal { message, .. } => message.clone(),
            Self::Database { source, .. } => source.to_string().into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ReplyKind {
        match self {
            Self::InvalidArgument { .. } => ReplyKind::InvalidArgument,
            Self::Database { .. } | Self::Internal { .. } => ReplyKind::Failed,
        }
    }
}
