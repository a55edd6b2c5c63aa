//! Integration tests for the SparkHub REST API.
//!
//! Each test runs the router against a fresh SQLite file and a mock wallet.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sparkhub_lib::test_utils::TestFixtures;
use sparkhub_lib::wallet::MockWallet;
use sparkhub_lib::{AddressCodec, LnurlConfig, PaymentResolver, ReadyWallet};
use sparkhub_server::api::{create_router, AppState};
use sparkhub_server::db::{create_pool, SqliteAddressRegistry};
use tempfile::TempDir;
use tower::ServiceExt;

const DOMAIN: &str = "sparkhub.example";

struct TestApp {
    router: axum::Router,
    wallet: Arc<MockWallet>,
    _dir: TempDir,
}

async fn setup_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("sparkhub.db").display());
    let pool = create_pool(&url, 5).await.unwrap();
    let registry = Arc::new(SqliteAddressRegistry::new(pool));

    let wallet = Arc::new(MockWallet::new());
    let ready = ReadyWallet::init(wallet.clone()).await.unwrap();
    let resolver = PaymentResolver::new(
        LnurlConfig::new(DOMAIN),
        registry.clone(),
        ready,
        AddressCodec::default(),
    );

    TestApp {
        router: create_router(AppState { resolver, registry }),
        wallet,
        _dir: dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn register(app: &TestApp, username: &str, address: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        post_json(
            "/api/users",
            serde_json::json!({ "username": username, "address": address }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_ping() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, get("/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "status": "ok", "message": "SparkHub is running" })
    );
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = setup_test_app().await;
    let request = Request::builder()
        .uri("/ping")
        .header("origin", "https://wallet.example")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_pay_request_metadata() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, get("/.well-known/lnurlp/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["tag"], "payRequest");
    assert_eq!(body["minSendable"], 100);
    assert_eq!(body["maxSendable"], 1_000_000_000u64);
    assert_eq!(body["commentAllowed"], 140);
    assert_eq!(
        body["callback"],
        "https://sparkhub.example/api/lightning-address/alice/callback"
    );
    assert_eq!(
        body["metadata"],
        r#"[["text/plain","Paying to alice@sparkhub.example"]]"#
    );
}

#[tokio::test]
async fn test_register_then_pay() {
    let app = setup_test_app().await;

    let (status, body) = register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["message"],
        "Username successfully associated with spark address"
    );
    assert_eq!(body["sparkAddress"], TestFixtures::MAINNET_ADDRESS);

    let (status, body) = send(
        &app,
        get("/api/lightning-address/alice/callback?amount=5000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["pr"].as_str().unwrap().starts_with("lnbc"));
    assert_eq!(body["routes"], serde_json::json!([]));
    assert_eq!(body["disposable"], false);
    assert_eq!(
        body["successAction"]["message"],
        "Payment received! Thank you for your payment to alice."
    );

    let requests = app.wallet.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].receiver_pubkey_hex, TestFixtures::MAINNET_PUBKEY);
    assert_eq!(requests[0].amount_sats, 5);
    assert_eq!(requests[0].memo, "Invoice");
}

#[tokio::test]
async fn test_callback_comment_becomes_memo() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;

    let (_, body) = send(
        &app,
        get("/api/lightning-address/alice/callback?amount=21000&comment=thanks%20alice&nonce=abc"),
    )
    .await;
    assert_eq!(body["status"], "OK");
    assert_eq!(app.wallet.requests()[0].memo, "thanks alice");
}

#[tokio::test]
async fn test_callback_unknown_username() {
    let app = setup_test_app().await;
    let (status, body) = send(
        &app,
        get("/api/lightning-address/unknown_user/callback?amount=5000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "status": "ERROR", "reason": "Username not found" })
    );
    assert!(app.wallet.requests().is_empty());
}

#[tokio::test]
async fn test_callback_missing_amount() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, get("/api/lightning-address/alice/callback")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["reason"], "Missing required parameters");
}

#[tokio::test]
async fn test_callback_raw_address() {
    let app = setup_test_app().await;
    let uri = format!(
        "/api/lightning-address/{}/callback?amount=1000",
        TestFixtures::LEGACY_ADDRESS
    );
    let (_, body) = send(&app, get(&uri)).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(
        app.wallet.requests()[0].receiver_pubkey_hex,
        TestFixtures::LEGACY_PUBKEY
    );
}

#[tokio::test]
async fn test_callback_wallet_failure() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;
    app.wallet.set_failure(true);

    let (status, body) = send(
        &app,
        get("/api/lightning-address/alice/callback?amount=5000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reason"], "Failed to create invoice");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;

    let (status, body) = register(&app, "alice", TestFixtures::LEGACY_ADDRESS).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Username alice already exists");

    let (_, body) = send(&app, get("/api/users/alice")).await;
    assert_eq!(body["address"], TestFixtures::MAINNET_ADDRESS);
}

#[tokio::test]
async fn test_register_claimed_address() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/users",
            serde_json::json!({ "username": "bob", "sparkAddress": TestFixtures::MAINNET_ADDRESS }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Spark address is already associated with another username"
    );
    assert_eq!(body["existingUsername"], "alice");
    assert_eq!(body["sparkAddress"], TestFixtures::MAINNET_ADDRESS);

    let (status, _) = send(&app, get("/api/users/bob")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/users", serde_json::json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and spark address are required");

    let long_name = "a".repeat(51);
    let (status, _) = register(&app, &long_name, TestFixtures::MAINNET_ADDRESS).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_lookup_by_username_and_address() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;

    let (status, body) = send(&app, get("/api/users/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["address"], TestFixtures::MAINNET_ADDRESS);

    for prefix in ["by-address", "by-spark-address"] {
        let uri = format!("/api/users/{}/{}", prefix, TestFixtures::MAINNET_ADDRESS);
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    let (status, body) = send(&app, get("/api/users/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Username nobody not found");

    let (status, body) = send(&app, get("/api/users/by-address/sp1unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "No username found for spark address: sp1unknown"
    );
}

#[tokio::test]
async fn test_update_user_address() {
    let app = setup_test_app().await;
    register(&app, "alice", TestFixtures::MAINNET_ADDRESS).await;
    register(&app, "bob", TestFixtures::BARE_PAYLOAD_ADDRESS).await;

    let (status, body) = send(
        &app,
        put_json(
            "/api/users/alice",
            serde_json::json!({ "address": TestFixtures::LEGACY_ADDRESS }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], TestFixtures::LEGACY_ADDRESS);

    // The old address is free again.
    let uri = format!("/api/users/by-address/{}", TestFixtures::MAINNET_ADDRESS);
    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        put_json(
            "/api/users/alice",
            serde_json::json!({ "address": TestFixtures::BARE_PAYLOAD_ADDRESS }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["existingUsername"], "bob");

    let (status, _) = send(
        &app,
        put_json(
            "/api/users/nobody",
            serde_json::json!({ "address": TestFixtures::MAINNET_ADDRESS }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
