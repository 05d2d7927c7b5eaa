use rsvp_database::DatabaseError;
use rsvp_kernel::server::ReplyKind;
use std::borrow::Cow;

#[rsvp_derive::rsvp_error]
pub enum SongError {
    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Song not found{}: {id}", format_context(.context))]
    NotFound { id: String, context: Option<Cow<'static, str>> },

    #[error("You have not added this song{}: {id}", format_context(.context))]
    NotOwner { id: String, context: Option<Cow<'static, str>> },

    #[error("Song store error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal song error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl SongError {
    #[must_use]
    pub fn reply_message(&self) -> Cow<'static, str> {
        match self {
            Self::Unauthorized { .. } => "Unauthorized".into(),
            Self::InvalidArgument { message, .. } | Self::Internal { message, .. } => message.clone(),
            Self::NotFound { .. } => "Song not found".into(),
            Self::NotOwner { .. } => "You have not added this song".into(),
            Self::Database { source, .. } => source.to_string().into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ReplyKind {
        match self {
            Self::Unauthorized { .. } => ReplyKind::Unauthorized,
            Self::InvalidArgument { .. } => ReplyKind::InvalidArgument,
            Self::NotFound { .. } => ReplyKind::NotFound,
            Self::NotOwner { .. } => ReplyKind::Forbidden,
            Self::Database { .. } | Self::Internal { .. } => ReplyKind::Failed,
        }
    }
}
