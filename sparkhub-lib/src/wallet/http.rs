//! Wallet sidecar REST executor.
//!
//! Talks to a Spark wallet sidecar process that owns the seed and the Spark
//! SDK connection.
//!
//! # Feature Flags
//!
//! Requires the `http-executor` feature for real HTTP requests. Without it
//! every call returns [`SparkhubError::Unimplemented`].
//!
//! # Endpoints
//!
//! | Method | Path | Body / Response |
//! |---|---|---|
//! | POST | `/v1/init` | → `{ "address": "spark1..." }` |
//! | GET | `/v1/address` | → `{ "address": "spark1..." }` |
//! | POST | `/v1/invoices` | `{ amountSats, memo, receiverIdentityPubkey }` → `{ "invoice": { "encodedInvoice": "lnbc..." } }` |
//! | GET | `/v1/events?after=<seq>` | → `{ "events": [{ "seq", "type", "transferId", "updatedBalance" }] }` |
//!
//! # Example
//!
//! ```rust,ignore
//! use sparkhub_lib::wallet::{HttpWalletExecutor, ReadyWallet, WalletConfig};
//!
//! let executor = HttpWalletExecutor::new(WalletConfig::new("http://localhost:8787"))?;
//! let wallet = ReadyWallet::init(Arc::new(executor)).await?;
//! let invoice = wallet.create_invoice_for_pubkey(&pubkey, 5, "Invoice").await?;
//! ```

use std::sync::Mutex;
#[cfg(feature = "http-executor")]
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::config::WalletConfig;
use super::{WalletEvent, WalletExecutor, EVENT_CHANNEL_CAPACITY};
use crate::{Result, SparkhubError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInvoiceRequest<'a> {
    amount_sats: u64,
    memo: &'a str,
    receiver_identity_pubkey: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedInvoice {
    encoded_invoice: String,
}

#[derive(Debug, Deserialize)]
struct CreateInvoiceResponse {
    invoice: EncodedInvoice,
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "http-executor"), allow(dead_code))]
struct SidecarEvent {
    seq: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transfer_id: Option<String>,
    #[serde(default)]
    updated_balance: Option<u64>,
}

#[cfg_attr(not(feature = "http-executor"), allow(dead_code))]
impl SidecarEvent {
    fn into_event(self) -> Option<WalletEvent> {
        match self.kind.as_str() {
            "transfer:claimed" => Some(WalletEvent::TransferClaimed {
                transfer_id: self.transfer_id?,
                updated_balance: self.updated_balance.unwrap_or(0),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "http-executor"), allow(dead_code))]
struct EventsResponse {
    #[serde(default)]
    events: Vec<SidecarEvent>,
}

/// REST executor for a Spark wallet sidecar.
pub struct HttpWalletExecutor {
    config: WalletConfig,
    #[cfg(feature = "http-executor")]
    client: reqwest::Client,
    events: broadcast::Sender<WalletEvent>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl HttpWalletExecutor {
    /// Create an executor for the sidecar described by `config`.
    pub fn new(config: WalletConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(SparkhubError::invalid_data(
                "base_url",
                "wallet URL cannot be empty",
            ));
        }

        #[cfg(feature = "http-executor")]
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SparkhubError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            #[cfg(feature = "http-executor")]
            client,
            events,
            poller: Mutex::new(None),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    #[cfg_attr(not(feature = "http-executor"), allow(dead_code))]
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    #[cfg(feature = "http-executor")]
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Make a GET request to the sidecar.
    #[cfg(feature = "http-executor")]
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| map_reqwest_error(&self.config, e))?;

        handle_response(response).await
    }

    /// Make a GET request to the sidecar (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    async fn get<T: for<'de> Deserialize<'de>>(&self, _path: &str) -> Result<T> {
        Err(SparkhubError::Unimplemented(
            "Wallet HTTP client (enable the 'http-executor' feature)",
        ))
    }

    /// Make a POST request with a JSON body.
    #[cfg(feature = "http-executor")]
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&self.config, e))?;

        handle_response(response).await
    }

    /// Make a POST request with a JSON body (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize + Sync>(
        &self,
        _path: &str,
        _body: &B,
    ) -> Result<T> {
        Err(SparkhubError::Unimplemented(
            "Wallet HTTP client (enable the 'http-executor' feature)",
        ))
    }

    #[cfg(feature = "http-executor")]
    fn start_event_poller(&self) {
        if self.config.event_poll_secs == 0 {
            return;
        }
        let Ok(mut slot) = self.poller.lock() else {
            return;
        };
        if slot.is_some() {
            return;
        }

        let poller = EventPoller {
            client: self.client.clone(),
            url: self.url("v1/events"),
            api_key: self.config.api_key.clone(),
            interval: Duration::from_secs(self.config.event_poll_secs),
            sender: self.events.clone(),
        };
        *slot = Some(tokio::spawn(poller.run()));
    }

    #[cfg(not(feature = "http-executor"))]
    fn start_event_poller(&self) {}
}

impl Drop for HttpWalletExecutor {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.poller.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

/// Handle an HTTP response, parsing JSON or returning an error.
#[cfg(feature = "http-executor")]
async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(map_status_error(status.as_u16(), &error_text));
    }

    response.json::<T>().await.map_err(|e| {
        SparkhubError::Serialization(format!("Failed to parse wallet response: {}", e))
    })
}

/// Map HTTP status codes to SparkhubError.
#[cfg(feature = "http-executor")]
fn map_status_error(status: u16, error_text: &str) -> SparkhubError {
    match status {
        400 => SparkhubError::InvalidData {
            field: "request".to_string(),
            reason: error_text.to_string(),
        },
        404 => SparkhubError::NotFound {
            resource_type: "wallet resource".to_string(),
            identifier: error_text.to_string(),
        },
        429 => SparkhubError::RateLimited {
            retry_after_ms: 5000,
        },
        500..=599 => {
            SparkhubError::Upstream(format!("wallet error ({}): {}", status, error_text))
        }
        _ => SparkhubError::Transport(format!(
            "wallet request failed ({}): {}",
            status, error_text
        )),
    }
}

/// Map reqwest errors to SparkhubError.
#[cfg(feature = "http-executor")]
fn map_reqwest_error(config: &WalletConfig, e: reqwest::Error) -> SparkhubError {
    if e.is_timeout() {
        SparkhubError::ConnectionTimeout {
            operation: "wallet request".to_string(),
            timeout_ms: config.timeout_secs * 1000,
        }
    } else if e.is_connect() {
        SparkhubError::ConnectionFailed {
            target: config.base_url.clone(),
            reason: e.to_string(),
        }
    } else {
        SparkhubError::Transport(format!("wallet request failed: {}", e))
    }
}

#[cfg(feature = "http-executor")]
struct EventPoller {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    interval: Duration,
    sender: broadcast::Sender<WalletEvent>,
}

#[cfg(feature = "http-executor")]
impl EventPoller {
    async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut cursor: u64 = 0;

        loop {
            ticker.tick().await;
            match self.fetch(cursor).await {
                Ok(events) => {
                    for event in events {
                        cursor = cursor.max(event.seq);
                        if let Some(event) = event.into_event() {
                            // no subscribers is fine
                            let _ = self.sender.send(event);
                        }
                    }
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("wallet event poll failed: {err}");
                    #[cfg(not(feature = "tracing"))]
                    let _ = err;
                }
            }
        }
    }

    async fn fetch(&self, after: u64) -> Result<Vec<SidecarEvent>> {
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("after", after.to_string())]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(SparkhubError::transport)?;
        let body: EventsResponse = handle_response(response).await?;
        Ok(body.events)
    }
}

#[async_trait]
impl WalletExecutor for HttpWalletExecutor {
    async fn init(&self) -> Result<()> {
        let response: AddressResponse = self.post("v1/init", &serde_json::json!({})).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(address = %response.address, network = %self.config.network, "wallet sidecar ready");
        #[cfg(not(feature = "tracing"))]
        let _ = response;

        self.start_event_poller();
        Ok(())
    }

    async fn create_invoice_for_pubkey(
        &self,
        receiver_pubkey_hex: &str,
        amount_sats: u64,
        memo: &str,
    ) -> Result<String> {
        let request = CreateInvoiceRequest {
            amount_sats,
            memo,
            receiver_identity_pubkey: receiver_pubkey_hex,
        };
        let response: CreateInvoiceResponse = self.post("v1/invoices", &request).await?;
        Ok(response.invoice.encoded_invoice)
    }

    async fn get_address(&self) -> Result<String> {
        let response: AddressResponse = self.get("v1/address").await?;
        Ok(response.address)
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        Some(self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_url() {
        assert!(HttpWalletExecutor::new(WalletConfig::new("")).is_err());
    }

    #[test]
    fn test_url_building() {
        let executor = HttpWalletExecutor::new(WalletConfig::new("http://localhost:8787/")).unwrap();
        assert_eq!(executor.url("v1/invoices"), "http://localhost:8787/v1/invoices");
    }

    #[test]
    fn test_sidecar_event_mapping() {
        let raw: EventsResponse = serde_json::from_str(
            r#"{"events":[
                {"seq":3,"type":"transfer:claimed","transferId":"abc","updatedBalance":1200},
                {"seq":4,"type":"deposit:confirmed"},
                {"seq":5,"type":"transfer:claimed"}
            ]}"#,
        )
        .unwrap();

        let mapped: Vec<_> = raw.events.into_iter().filter_map(|e| e.into_event()).collect();
        assert_eq!(
            mapped,
            vec![WalletEvent::TransferClaimed {
                transfer_id: "abc".to_string(),
                updated_balance: 1200,
            }]
        );
    }

    #[test]
    fn test_invoice_request_shape() {
        let body = serde_json::to_value(CreateInvoiceRequest {
            amount_sats: 5,
            memo: "Invoice",
            receiver_identity_pubkey: "02ab",
        })
        .unwrap();
        assert_eq!(body["amountSats"], 5);
        assert_eq!(body["receiverIdentityPubkey"], "02ab");
    }
}
