use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use rsvp_database::Database;
use rsvp_event_bus::EventBus;
use rsvp_gifts::Gifts;
use rsvp_kernel::domain::config::ApiConfig;
use rsvp_kernel::domain::constants::SERVICE_KEY_HEADER;
use rsvp_kernel::server::{ApiState, issue_token};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

struct Harness {
    app: Router,
    config: ApiConfig,
}

impl Harness {
    async fn new() -> Self {
        let config = ApiConfig::default();
        let db = Database::builder()
            .url("mem://")
            .session("test", "gifts_api")
            .migrations(rsvp_gifts::migrations())
            .init()
            .await
            .unwrap();
        let events = EventBus::new();

        let state = ApiState::builder()
            .config(config.clone())
            .db(db.clone())
            .events(events.clone())
            .register_slice(rsvp_gifts::init(&db, &events).unwrap())
            .build()
            .unwrap();
        state.get_slice::<Gifts>().unwrap().ledger.seed("g1", None).await.unwrap();

        let (router, _) = rsvp_gifts::router().split_for_parts();
        Self { app: router.with_state(state), config }
    }

    fn token(&self, uid: &str) -> String {
        issue_token(&self.config.security.identity.jwt, uid, Duration::from_secs(300)).unwrap()
    }

    async fn post(&self, path: &str, uid: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = Request::post(path).header("content-type", "application/json");
        if let Some(uid) = uid {
            request = request.header("authorization", format!("Bearer {}", self.token(uid)));
        }
        let response =
            self.app.clone().oneshot(request.body(Body::from(body.to_string())).unwrap()).await.unwrap();
        read(response).await
    }
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn claim_and_release_round_trip_over_http() {
    let h = Harness::new().await;

    let (status, body) = h.post("/gifts/claim", Some("alice"), json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Ok", "giftId": "g1" }));

    let (status, body) = h.post("/gifts/claim", Some("bob"), json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "message": "Gift is already reserved", "giftId": "g1" }));

    let (status, body) = h.post("/gifts/release", Some("bob"), json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You have not made the gift reservation");

    let (status, body) = h.post("/gifts/release", Some("alice"), json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ok");
}

#[tokio::test]
async fn rejections_are_structured() {
    let h = Harness::new().await;

    let (status, body) = h.post("/gifts/claim", None, json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthorized" }));

    let (status, body) = h.post("/gifts/claim", Some("alice"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "giftId is required");

    let (status, body) = h.post("/gifts/release", Some("alice"), json!({ "giftId": "g404" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Gift not found", "giftId": "g404" }));
}

#[tokio::test]
async fn malformed_bodies_are_structured() {
    let h = Harness::new().await;
    let token = h.token("alice");

    let without_content_type = Request::post("/gifts/claim")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json!({ "giftId": "g1" }).to_string()))
        .unwrap();
    let (status, body) = read(h.app.clone().oneshot(without_content_type).await.unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert!(body.get("giftId").is_none());

    let (status, body) =
        h.post("/gifts/claim", Some("alice"), json!({ "giftId": "g1", "note": "hi" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("note"));

    let (status, _) = h.post("/gifts/claim", Some("alice"), json!({ "giftId": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = h.post("/gifts/claim", Some("alice"), json!({ "giftId": "g1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["giftId"], "g1");
}

#[tokio::test]
async fn report_requires_service_key() {
    let h = Harness::new().await;
    h.post("/gifts/claim", Some("alice"), json!({ "giftId": "g1" })).await;

    let response = h
        .app
        .clone()
        .oneshot(Request::get("/gifts/report").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = h
        .app
        .clone()
        .oneshot(
            Request::get("/gifts/report")
                .header(SERVICE_KEY_HEADER, h.config.security.service_key.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "alice": 1 }));
}
