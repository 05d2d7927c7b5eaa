use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use rsvp::domain::config::ApiConfig;
use rsvp::domain::constants::SERVICE_KEY_HEADER;
use rsvp::features::gifts::Gifts;
use rsvp::kernel::server::issue_token;
use rsvp_server::Server;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

async fn send(server: &Server, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, bytes.to_vec())
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn serves_health_and_docs() {
    let server = Server::builder().build().await.unwrap();
    assert_eq!(server.state().slice_count(), 3);

    let (status, body) = send(&server, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["status"], "up");

    let (status, _) = send(&server, Request::get("/api").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn slices_are_wired_end_to_end() {
    let config = ApiConfig::default();
    let key = config.security.service_key.clone();
    let server = Server::builder().config(config.clone()).build().await.unwrap();
    server.state().get_slice::<Gifts>().unwrap().ledger.seed("g1", None).await.unwrap();

    let request = Request::post("/hooks/users")
        .header("content-type", "application/json")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::from(json!({ "uid": "alice", "email": "alice@example.com" }).to_string()))
        .unwrap();
    let (status, _) = send(&server, request).await;
    assert_eq!(status, StatusCode::OK);

    let token = issue_token(&config.security.identity.jwt, "alice", Duration::from_secs(60)).unwrap();
    let request = Request::post("/gifts/claim")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json!({ "giftId": "g1" }).to_string()))
        .unwrap();
    let (status, body) = send(&server, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({ "message": "Ok", "giftId": "g1" }));

    let request = Request::get("/gifts/report")
        .header(SERVICE_KEY_HEADER, key.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&server, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({ "alice": 1 }));
}

#[tokio::test]
async fn empty_service_key_is_refused() {
    let mut config = ApiConfig::default();
    config.security.service_key = String::new();

    let err = Server::builder().config(config).build().await.unwrap_err();
    assert!(err.to_string().contains("service_key"));
}
