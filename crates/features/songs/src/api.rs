use crate::Songs;
use crate::error::SongError;
use crate::model::SongRecord;
use axum::Json;
use axum::extract::{Path, State};
use rsvp_kernel::prelude::*;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
pub struct AddSongRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

/// Outcome of an add or remove. `id` is echoed once the caller is known.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SongReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SongReply {
    fn failure(err: &SongError, id: Option<String>) -> Reply<Self> {
        let id = match err {
            SongError::Unauthorized { .. } => None,
            _ => id,
        };
        Reply::new(err.kind(), Self { message: err.reply_message().into_owned(), id })
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SongRequest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub added_by: String,
    pub created_at: i64,
}

impl From<SongRecord> for SongRequest {
    fn from(record: SongRecord) -> Self {
        Self {
            id: record.key,
            name: record.name,
            artist: record.artist,
            added_by: record.added_by,
            created_at: record.created_at,
        }
    }
}

fn slice(state: &ApiState) -> Result<&Songs, SongError> {
    state.try_get_slice::<Songs>().map_err(|e| SongError::from(e.to_string()))
}

#[api_handler(
    post,
    path = "/songs",
    request_body = AddSongRequest,
    responses(
        (status = OK, description = "Song request stored", body = SongReply),
        (status = UNAUTHORIZED, description = "No verified caller", body = SongReply),
        (status = BAD_REQUEST, description = "Song name missing", body = SongReply),
    ),
    tag = SONGS_TAG,
)]
pub(crate) async fn add_handler(
    State(state): State<ApiState>,
    caller: Caller,
    Payload(request): Payload<AddSongRequest>,
) -> Reply<SongReply> {
    let result = match slice(&state) {
        Ok(songs) => {
            songs.book.add(caller.uid(), &request.name, request.artist.as_deref()).await
        },
        Err(err) => Err(err),
    };
    match result {
        Ok(id) => Reply::ok(SongReply { message: OK.to_owned(), id: Some(id) }),
        Err(err) => SongReply::failure(&err, None),
    }
}

#[api_handler(
    delete,
    path = "/songs/{id}",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = OK, description = "Song request removed", body = SongReply),
        (status = UNAUTHORIZED, description = "No verified caller", body = SongReply),
        (status = NOT_FOUND, description = "Unknown song", body = SongReply),
        (status = FORBIDDEN, description = "Song added by someone else", body = SongReply),
    ),
    tag = SONGS_TAG,
)]
pub(crate) async fn remove_handler(
    State(state): State<ApiState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Reply<SongReply> {
    let result = match slice(&state) {
        Ok(songs) => songs.book.remove(caller.uid(), &id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(key) => Reply::ok(SongReply { message: OK.to_owned(), id: Some(key) }),
        Err(err) => SongReply::failure(&err, Some(id)),
    }
}

#[api_handler(
    get,
    path = "/songs",
    responses(
        (status = OK, description = "All song requests, oldest first", body = Vec<SongRequest>),
        (status = UNAUTHORIZED, description = "No verified caller", body = MessageReply),
    ),
    tag = SONGS_TAG,
)]
pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    caller: Caller,
) -> Result<Json<Vec<SongRequest>>, Reply<MessageReply>> {
    let failure = |err: SongError| Reply::new(err.kind(), MessageReply::new(err.reply_message()));

    if caller.is_anonymous() {
        return Err(failure(SongError::Unauthorized { context: None }));
    }
    let songs = slice(&state).map_err(failure)?.book.list().await.map_err(failure)?;

    Ok(Json(songs.into_iter().map(SongRequest::from).collect()))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(add_handler, list_handler))
        .routes(routes!(remove_handler))
}
