use crate::Guests;
use crate::error::GuestError;
use axum::extract::{Path, State};
use rsvp_kernel::prelude::*;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
pub struct ProvisionRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct AccountReply {
    pub message: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_guests: Option<usize>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct RenameReply {
    pub message: String,
    pub renamed: usize,
}

fn slice(state: &ApiState) -> Result<&Guests, GuestError> {
    state.try_get_slice::<Guests>().map_err(|e| GuestError::from(e.to_string()))
}

fn failure(err: &GuestError) -> Reply<MessageReply> {
    Reply::new(err.kind(), MessageReply::new(err.reply_message()))
}

#[api_handler(
    post,
    path = "/hooks/users",
    request_body = ProvisionRequest,
    responses(
        (status = OK, description = "User and primary guest written", body = AccountReply),
        (status = BAD_REQUEST, description = "uid or email missing", body = MessageReply),
        (status = UNAUTHORIZED, description = "Missing service key", body = MessageReply),
    ),
    tag = HOOKS_TAG,
)]
pub(crate) async fn provision_handler(
    _: ServiceKey,
    State(state): State<ApiState>,
    Payload(request): Payload<ProvisionRequest>,
) -> Result<Reply<AccountReply>, Reply<MessageReply>> {
    let guests = slice(&state).map_err(|e| failure(&e))?;
    let user = guests.directory.provision(&request.uid, &request.email).await.map_err(|e| failure(&e))?;

    Ok(Reply::ok(AccountReply { message: OK.to_owned(), uid: user.key, removed_guests: None }))
}

#[api_handler(
    delete,
    path = "/hooks/users/{uid}",
    params(("uid" = String, Path, description = "Account uid")),
    responses(
        (status = OK, description = "User and owned guests deleted", body = AccountReply),
        (status = UNAUTHORIZED, description = "Missing service key", body = MessageReply),
    ),
    tag = HOOKS_TAG,
)]
pub(crate) async fn remove_handler(
    _: ServiceKey,
    State(state): State<ApiState>,
    Path(uid): Path<String>,
) -> Result<Reply<AccountReply>, Reply<MessageReply>> {
    let guests = slice(&state).map_err(|e| failure(&e))?;
    let removed = guests.directory.remove(&uid).await.map_err(|e| failure(&e))?;

    Ok(Reply::ok(AccountReply { message: OK.to_owned(), uid, removed_guests: Some(removed) }))
}

#[api_handler(
    post,
    path = "/maintenance/rename-guests",
    responses(
        (status = OK, description = "E-mail shaped guest names normalised", body = RenameReply),
        (status = UNAUTHORIZED, description = "Missing service key", body = MessageReply),
    ),
    tag = MAINTENANCE_TAG,
)]
pub(crate) async fn rename_handler(
    _: ServiceKey,
    State(state): State<ApiState>,
) -> Result<Reply<RenameReply>, Reply<MessageReply>> {
    let guests = slice(&state).map_err(|e| failure(&e))?;
    let renamed = guests.directory.rename_guests().await.map_err(|e| failure(&e))?;

    Ok(Reply::ok(RenameReply { message: OK.to_owned(), renamed }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(provision_handler))
        .routes(routes!(remove_handler))
        .routes(routes!(rename_handler))
}
