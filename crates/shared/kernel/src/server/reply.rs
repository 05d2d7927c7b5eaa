use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rsvp_derive::api_model;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Classes of outcome every slice reports; each maps to one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Ok,
    Unauthorized,
    InvalidArgument,
    NotFound,
    /// The record is held by someone else.
    Conflict,
    /// The caller does not own the record.
    Forbidden,
    Failed,
}

impl ReplyKind {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body for replies that only carry a message.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MessageReply {
    pub message: String,
}

impl MessageReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A JSON body paired with the status derived from its [`ReplyKind`].
///
/// Handlers return this for successes and failures alike, so every outcome
/// reaches the client as a structured object.
#[derive(Debug)]
pub struct Reply<T> {
    kind: ReplyKind,
    body: T,
}

impl<T> Reply<T> {
    pub const fn new(kind: ReplyKind, body: T) -> Self {
        Self { kind, body }
    }

    pub const fn ok(body: T) -> Self {
        Self::new(ReplyKind::Ok, body)
    }

    #[must_use]
    pub const fn kind(&self) -> ReplyKind {
        self.kind
    }

    #[must_use]
    pub const fn body(&self) -> &T {
        &self.body
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.kind.status(), Json(self.body)).into_response()
    }
}

/// JSON request body. A body axum cannot read or decode becomes an
/// `InvalidArgument` [`Reply`] instead of a plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Reply<MessageReply>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Request body rejected");
                Err(Reply::new(ReplyKind::InvalidArgument, MessageReply::new(rejection.body_text())))
            },
        }
    }
}
