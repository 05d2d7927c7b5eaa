use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use rsvp_database::Database;
use rsvp_event_bus::EventBus;
use rsvp_kernel::domain::config::ApiConfig;
use rsvp_kernel::domain::constants::SERVICE_KEY_HEADER;
use rsvp_kernel::server::ApiState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> (Router, String) {
    let config = ApiConfig::default();
    let key = config.security.service_key.clone();
    let db = Database::builder()
        .url("mem://")
        .session("test", "guests_api")
        .migrations(rsvp_guests::migrations())
        .init()
        .await
        .unwrap();
    let events = EventBus::new();
    let state = ApiState::builder()
        .config(config)
        .db(db.clone())
        .events(events.clone())
        .register_slice(rsvp_guests::init(&db, &events).unwrap())
        .build()
        .unwrap();

    let (router, _) = rsvp_guests::router().split_for_parts();
    (router.with_state(state), key)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn hooks_need_the_service_key() {
    let (app, _) = app().await;
    let request = Request::post("/hooks/users")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "uid": "u1", "email": "a@b.c" }).to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn account_lifecycle_over_http() {
    let (app, key) = app().await;

    let request = Request::post("/hooks/users")
        .header("content-type", "application/json")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::from(json!({ "uid": "u1", "email": "jane@doe.com" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Ok", "uid": "u1" }));

    let request = Request::post("/maintenance/rename-guests")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Ok", "renamed": 1 }));

    let request = Request::delete("/hooks/users/u1")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Ok", "uid": "u1", "removedGuests": 1 }));
}

#[tokio::test]
async fn missing_email_is_a_bad_request() {
    let (app, key) = app().await;
    let request = Request::post("/hooks/users")
        .header("content-type", "application/json")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::from(json!({ "uid": "u1" }).to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email is required");
}

#[tokio::test]
async fn unknown_fields_are_a_message_reply() {
    let (app, key) = app().await;
    let request = Request::post("/hooks/users")
        .header("content-type", "application/json")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::from(json!({ "uid": "u1", "email": "a@b.c", "role": "admin" }).to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("role"));
}
