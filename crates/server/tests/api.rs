use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use ledger::{CurrencyPolicy, Ledger, WalletService};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use server::ServerState;
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db).build().await.unwrap();
    let service = WalletService::new(Arc::new(ledger));
    server::router(ServerState::new(service, CurrencyPolicy::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str, accept: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().uri(uri);
    if let Some(accept) = accept {
        request = request.header(header::ACCEPT, accept);
    }
    send(app, request.body(Body::empty()).unwrap()).await
}

async fn create_wallet(app: &Router, name: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/v1/wallets",
        json!({"name": name, "currency": "USD"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_read_wallet() {
    let app = app().await;
    let id = create_wallet(&app, "Savings").await;

    let (status, body) = get(&app, &format!("/api/v1/wallets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["name"], "Savings");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["balance"], 0);
}

#[tokio::test]
async fn wallet_validation() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/v1/wallets",
        json!({"name": "Cash", "currency": "EUR"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("EUR"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/wallets",
        json!({"name": "  ", "currency": "USD"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/v1/wallets/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = get(&app, &format!("/api/v1/wallets/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deposit_and_transfer() {
    let app = app().await;
    let alice = create_wallet(&app, "Alice").await;
    let bob = create_wallet(&app, "Bob").await;

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{alice}/deposit"),
        json!({"amount": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 100);

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{bob}/transfer"),
        json!({"amount": 30, "sender_wallet_id": alice}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sender_wallet_balance"], 70);
    assert_eq!(body["balance"], 30);
}

#[tokio::test]
async fn transfer_failures() {
    let app = app().await;
    let alice = create_wallet(&app, "Alice").await;
    let bob = create_wallet(&app, "Bob").await;

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{bob}/transfer"),
        json!({"amount": 30, "sender_wallet_id": alice}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{alice}/transfer"),
        json!({"amount": 30, "sender_wallet_id": alice}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{alice}/deposit"),
        json!({"amount": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{missing}/deposit"),
        json!({"amount": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_as_json_and_csv() {
    let app = app().await;
    let alice = create_wallet(&app, "Alice").await;
    let bob = create_wallet(&app, "Bob").await;
    send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{alice}/deposit"),
        json!({"amount": 100}),
    )
    .await;
    send_json(
        &app,
        "POST",
        &format!("/api/v1/wallets/{bob}/transfer"),
        json!({"amount": 40, "sender_wallet_id": alice}),
    )
    .await;

    let uri = format!("/api/v1/wallets/{alice}/transactions");
    let (status, body) = get(&app, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["operation_type"], "transfer");
    assert_eq!(items[0]["sender_wallet_me"], true);
    assert_eq!(items[0]["recipient_wallet_id"], bob.as_str());
    assert_eq!(items[0]["recipient_wallet_balance"], 40);
    assert_eq!(items[0]["balance"], 60);
    assert!(items[0].get("sender_wallet_id").is_none());
    assert_eq!(items[1]["operation_type"], "deposit");
    assert!(items[1].get("sender_wallet_me").is_none());
    assert!(items[1].get("recipient_wallet_id").is_none());

    let (status, body) = get(
        &app,
        &format!("/api/v1/wallets/{bob}/transactions?limit=1&operation_type=transfer"),
        Some("text/csv"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("OperationType,Amount,SenderWalletId"));
    assert!(lines[1].starts_with(&format!("transfer,40,{alice},60,NULL,NULL,NULL,true,40,")));
}

#[tokio::test]
async fn history_rejects_bad_requests() {
    let app = app().await;
    let alice = create_wallet(&app, "Alice").await;
    let uri = format!("/api/v1/wallets/{alice}/transactions");

    let (status, _) = get(&app, &uri, Some("application/xml")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    for query in [
        "limit=-2",
        "offset=abc",
        "operation_type=withdrawal",
        "processed_at.gte=yesterday",
        "processed_at.gte=2022-01-11T00:00:00Z&processed_at.lte=2022-01-10T00:00:00Z",
    ] {
        let (status, body) = get(&app, &format!("{uri}?{query}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query: {query}");
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn docs_are_served() {
    let app = app().await;

    let (status, body) = get(&app, "/api.yaml", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().starts_with("openapi:"));

    let (status, body) = get(&app, "/docs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/api.yaml"));
}
