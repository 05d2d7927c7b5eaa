use rsvp_database::DatabaseError;
use rsvp_kernel::server::ReplyKind;
use std::borrow::Cow;

/// Every way a reservation operation can end other than success.
#[rsvp_derive::rsvp_error]
pub enum GiftError {
    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Gift not found{}: {gift_id}", format_context(.context))]
    NotFound { gift_id: String, context: Option<Cow<'static, str>> },

    #[error("Gift is already reserved{}: {gift_id}", format_context(.context))]
    AlreadyReserved { gift_id: String, context: Option<Cow<'static, str>> },

    #[error("You have not made the gift reservation{}: {gift_id}", format_context(.context))]
    NotOwner { gift_id: String, context: Option<Cow<'static, str>> },

    #[error("Gift store error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal gift error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<surrealdb::Error> for GiftError {
    fn from(source: surrealdb::Error) -> Self {
        Self::Database { source: source.into(), context: None }
    }
}

impl GiftError {
    /// The client-facing message. Store failures surface their own text.
    #[must_use]
    pub fn reply_message(&self) -> Cow<'static, str> {
        match self {
            Self::Unauthorized { .. } => "Unauthorized".into(),
            Self::InvalidArgument { message, .. } => message.clone(),
            Self::NotFound { .. } => "Gift not found".into(),
            Self::AlreadyReserved { .. } => "Gift is already reserved".into(),
            Self::NotOwner { .. } => "You have not made the gift reservation".into(),
            Self::Database { source, .. } => source.to_string().into(),
            Self::Internal { message, .. } => message.clone(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ReplyKind {
        match self {
            Self::Unauthorized { .. } => ReplyKind::Unauthorized,
            Self::InvalidArgument { .. } => ReplyKind::InvalidArgument,
            Self::NotFound { .. } => ReplyKind::NotFound,
            Self::AlreadyReserved { .. } => ReplyKind::Conflict,
            Self::NotOwner { .. } => ReplyKind::Forbidden,
            Self::Database { .. } | Self::Internal { .. } => ReplyKind::Failed,
        }
    }
}
