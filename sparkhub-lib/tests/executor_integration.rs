//! Integration tests for the HTTP collaborators.
//!
//! These tests drive the wallet sidecar executor and the LNURL client
//! against mock HTTP servers.
//!
//! ```bash
//! cargo test -p sparkhub-lib --features http-executor --test executor_integration
//! ```

#![cfg(feature = "http-executor")]

use std::sync::Arc;
use std::time::Duration;

use sparkhub_lib::lnurl::{LightningAddress, LnurlClient};
use sparkhub_lib::wallet::{HttpWalletExecutor, ReadyWallet, WalletConfig, WalletEvent};
use sparkhub_lib::SparkhubError;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const PUBKEY: &str = "037c7a8b9b1411652f0532cddb9367846be97699dddb804c79eef53c209b02cc91";

async fn mount_init(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/init"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": "spark1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3u9ftwa"
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Wallet sidecar executor
// ============================================================================

#[tokio::test]
async fn test_wallet_create_invoice_mock() {
    let server = MockServer::start().await;
    mount_init(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices"))
        .and(header("authorization", "Bearer test_key"))
        .and(body_json(serde_json::json!({
            "amountSats": 5,
            "memo": "Invoice",
            "receiverIdentityPubkey": PUBKEY
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "invoice": { "encodedInvoice": "lnbc50n1ptest" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = WalletConfig::new(server.uri())
        .with_api_key("test_key")
        .with_event_poll(0);
    let executor = HttpWalletExecutor::new(config).unwrap();
    let wallet = ReadyWallet::init(Arc::new(executor)).await.unwrap();

    let invoice = wallet
        .create_invoice_for_pubkey(PUBKEY, 5, "Invoice")
        .await
        .unwrap();
    assert_eq!(invoice, "lnbc50n1ptest");
}

#[tokio::test]
async fn test_wallet_init_failure_mock() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/init"))
        .respond_with(ResponseTemplate::new(503).set_body_string("seed unavailable"))
        .mount(&server)
        .await;

    let executor = HttpWalletExecutor::new(WalletConfig::new(server.uri())).unwrap();
    let err = ReadyWallet::init(Arc::new(executor)).await.unwrap_err();
    assert!(matches!(err, SparkhubError::Upstream(_)));
}

#[tokio::test]
async fn test_wallet_invoice_server_error_mock() {
    let server = MockServer::start().await;
    mount_init(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = WalletConfig::new(server.uri()).with_event_poll(0);
    let executor = HttpWalletExecutor::new(config).unwrap();
    let wallet = ReadyWallet::init(Arc::new(executor)).await.unwrap();

    let err = wallet
        .create_invoice_for_pubkey(PUBKEY, 5, "Invoice")
        .await
        .unwrap_err();
    assert!(matches!(err, SparkhubError::Upstream(ref msg) if msg.contains("boom")));
}

#[tokio::test]
async fn test_wallet_get_address_mock() {
    let server = MockServer::start().await;
    mount_init(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": "sparkrt1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3wr8hzz"
        })))
        .mount(&server)
        .await;

    let executor = HttpWalletExecutor::new(WalletConfig::new(server.uri())).unwrap();
    let address = executor_address(executor).await;
    assert!(address.starts_with("sparkrt1"));
}

async fn executor_address(executor: HttpWalletExecutor) -> String {
    use sparkhub_lib::wallet::WalletExecutor;
    executor.get_address().await.unwrap()
}

#[tokio::test]
async fn test_wallet_events_are_broadcast() {
    let server = MockServer::start().await;
    mount_init(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/events"))
        .and(query_param("after", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [
                { "seq": 1, "type": "transfer:claimed", "transferId": "t-1", "updatedBalance": 2100 },
                { "seq": 2, "type": "something:else" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/events"))
        .and(query_param("after", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "events": [] })))
        .mount(&server)
        .await;

    let config = WalletConfig::new(server.uri()).with_event_poll(1);
    let executor = HttpWalletExecutor::new(config).unwrap();
    let wallet = ReadyWallet::init(Arc::new(executor)).await.unwrap();
    let mut events = wallet.subscribe().unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within timeout")
        .unwrap();
    assert_eq!(
        event,
        WalletEvent::TransferClaimed {
            transfer_id: "t-1".to_string(),
            updated_balance: 2100,
        }
    );
}

#[tokio::test]
async fn test_wallet_connection_refused() {
    let config = WalletConfig::new("http://127.0.0.1:1").with_timeout(2);
    let executor = HttpWalletExecutor::new(config).unwrap();
    let err = ReadyWallet::init(Arc::new(executor)).await.unwrap_err();
    assert!(matches!(
        err,
        SparkhubError::ConnectionFailed { .. } | SparkhubError::Transport(_)
    ));
}

// ============================================================================
// LNURL client
// ============================================================================

fn pay_request_body(callback: String) -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "commentAllowed": 140,
        "callback": callback,
        "maxSendable": 1_000_000_000u64,
        "minSendable": 100,
        "metadata": "[[\"text/plain\",\"Paying to alice@localhost\"]]",
        "tag": "payRequest"
    })
}

fn address_for(server: &MockServer) -> LightningAddress {
    let host = server.uri().trim_start_matches("http://").to_string();
    LightningAddress::parse(&format!("alice@{}", host)).unwrap()
}

#[tokio::test]
async fn test_lnurl_full_flow_mock() {
    let server = MockServer::start().await;
    let callback = format!("{}/api/lightning-address/alice/callback", server.uri());

    Mock::given(method("GET"))
        .and(path("/.well-known/lnurlp/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pay_request_body(callback)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/lightning-address/alice/callback"))
        .and(query_param("amount", "21000"))
        .and(query_param("comment", "for coffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "pr": "lnbc210n1ptest",
            "routes": [],
            "disposable": false,
            "successAction": { "tag": "message", "message": "thanks" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LnurlClient::new().unwrap().insecure();
    let invoice = client
        .invoice_for(&address_for(&server), 21, Some("for coffee"))
        .await
        .unwrap();
    assert_eq!(invoice, "lnbc210n1ptest");
}

#[tokio::test]
async fn test_lnurl_error_reason_surfaces() {
    let server = MockServer::start().await;
    let callback = format!("{}/cb", server.uri());

    Mock::given(method("GET"))
        .and(path("/.well-known/lnurlp/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pay_request_body(callback)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ERROR",
            "reason": "Username not found"
        })))
        .mount(&server)
        .await;

    let client = LnurlClient::new().unwrap().insecure();
    let err = client
        .invoice_for(&address_for(&server), 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SparkhubError::Upstream(ref r) if r == "Username not found"));
}

#[tokio::test]
async fn test_lnurl_rejects_wrong_tag() {
    let server = MockServer::start().await;
    let mut body = pay_request_body(format!("{}/cb", server.uri()));
    body["tag"] = serde_json::json!("withdrawRequest");

    Mock::given(method("GET"))
        .and(path("/.well-known/lnurlp/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = LnurlClient::new().unwrap().insecure();
    let err = client
        .fetch_pay_request(&address_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, SparkhubError::InvalidData { ref field, .. } if field == "tag"));
}

#[tokio::test]
async fn test_lnurl_amount_out_of_range_not_sent() {
    let server = MockServer::start().await;
    let callback = format!("{}/cb", server.uri());

    Mock::given(method("GET"))
        .and(path("/.well-known/lnurlp/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pay_request_body(callback)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cb"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = LnurlClient::new().unwrap().insecure();
    let err = client
        .invoice_for(&address_for(&server), 2_000_000, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SparkhubError::InvalidData { ref field, .. } if field == "amount"));
}
