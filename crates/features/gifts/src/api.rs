use crate::Gifts;
use crate::error::GiftError;
use axum::Json;
use axum::extract::State;
use rsvp_kernel::prelude::*;
use std::collections::BTreeMap;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
pub struct GiftRequest {
    #[serde(default)]
    pub gift_id: String,
}

/// Outcome of a claim or release. `giftId` is echoed once the caller is known.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct GiftReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_id: Option<String>,
}

impl GiftReply {
    fn from_result<T>(result: Result<T, GiftError>, gift_id: String) -> Reply<Self> {
        match result {
            Ok(_) => Reply::ok(Self { message: OK.to_owned(), gift_id: Some(gift_id) }),
            Err(err) => {
                let gift_id = match err {
                    GiftError::Unauthorized { .. } => None,
                    _ => Some(gift_id),
                };
                Reply::new(err.kind(), Self { message: err.reply_message().into_owned(), gift_id })
            },
        }
    }
}

fn slice(state: &ApiState) -> Result<&Gifts, GiftError> {
    state.try_get_slice::<Gifts>().map_err(|e| GiftError::from(e.to_string()))
}

#[api_handler(
    post,
    path = "/gifts/claim",
    request_body = GiftRequest,
    responses(
        (status = OK, description = "Gift reserved for the caller", body = GiftReply),
        (status = UNAUTHORIZED, description = "No verified caller", body = GiftReply),
        (status = BAD_REQUEST, description = "giftId missing or malformed", body = GiftReply),
        (status = NOT_FOUND, description = "Unknown gift", body = GiftReply),
        (status = CONFLICT, description = "Gift already reserved", body = GiftReply),
    ),
    tag = GIFTS_TAG,
)]
pub(crate) async fn claim_handler(
    State(state): State<ApiState>,
    caller: Caller,
    Payload(request): Payload<GiftRequest>,
) -> Reply<GiftReply> {
    let result = match slice(&state) {
        Ok(gifts) => gifts.ledger.claim(caller.uid(), &request.gift_id).await,
        Err(err) => Err(err),
    };
    GiftReply::from_result(result, request.gift_id)
}

#[api_handler(
    post,
    path = "/gifts/release",
    request_body = GiftRequest,
    responses(
        (status = OK, description = "Reservation cleared", body = GiftReply),
        (status = UNAUTHORIZED, description = "No verified caller", body = GiftReply),
        (status = BAD_REQUEST, description = "giftId missing or malformed", body = GiftReply),
        (status = NOT_FOUND, description = "Unknown gift", body = GiftReply),
        (status = FORBIDDEN, description = "Caller does not hold the reservation", body = GiftReply),
    ),
    tag = GIFTS_TAG,
)]
pub(crate) async fn release_handler(
    State(state): State<ApiState>,
    caller: Caller,
    Payload(request): Payload<GiftRequest>,
) -> Reply<GiftReply> {
    let result = match slice(&state) {
        Ok(gifts) => gifts.ledger.release(caller.uid(), &request.gift_id).await,
        Err(err) => Err(err),
    };
    GiftReply::from_result(result, request.gift_id)
}

#[api_handler(
    get,
    path = "/gifts/report",
    responses(
        (status = OK, description = "Reserved gift count per holder", body = BTreeMap<String, u64>),
        (status = UNAUTHORIZED, description = "Missing service key", body = MessageReply),
    ),
    tag = GIFTS_TAG,
)]
pub(crate) async fn report_handler(
    _: ServiceKey,
    State(state): State<ApiState>,
) -> Result<Json<BTreeMap<String, u64>>, Reply<MessageReply>> {
    let report = match slice(&state) {
        Ok(gifts) => gifts.ledger.report().await,
        Err(err) => Err(err),
    };
    report
        .map(Json)
        .map_err(|err| Reply::new(err.kind(), MessageReply::new(err.reply_message())))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(claim_handler))
        .routes(routes!(release_handler))
        .routes(routes!(report_handler))
}
