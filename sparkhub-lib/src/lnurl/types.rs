//! LNURL-pay (LUD-06 / LUD-16) wire types.

use serde::{Deserialize, Serialize};

/// `status` value of successful LNURL responses.
pub const STATUS_OK: &str = "OK";

/// `status` value of failed LNURL responses.
pub const STATUS_ERROR: &str = "ERROR";

/// `tag` identifying a pay request.
pub const PAY_REQUEST_TAG: &str = "payRequest";

/// Static LNURL-pay parameters for one domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LnurlConfig {
    /// Public domain (host[:port]) the Lightning Addresses live under.
    pub domain: String,

    /// Maximum comment length accepted on callbacks.
    #[serde(default = "default_comment_allowed")]
    pub comment_allowed: u32,

    /// Minimum amount in millisatoshis.
    #[serde(default = "default_min_sendable")]
    pub min_sendable: u64,

    /// Maximum amount in millisatoshis.
    #[serde(default = "default_max_sendable")]
    pub max_sendable: u64,
}

fn default_comment_allowed() -> u32 {
    140
}

fn default_min_sendable() -> u64 {
    100
}

fn default_max_sendable() -> u64 {
    1_000_000_000
}

impl LnurlConfig {
    /// Defaults for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            comment_allowed: default_comment_allowed(),
            min_sendable: default_min_sendable(),
            max_sendable: default_max_sendable(),
        }
    }

    /// Set the comment cap.
    pub fn with_comment_allowed(mut self, chars: u32) -> Self {
        self.comment_allowed = chars;
        self
    }

    /// Callback URL for `username`.
    pub fn callback_url(&self, username: &str) -> String {
        format!(
            "https://{}/api/lightning-address/{}/callback",
            self.domain, username
        )
    }

    /// Metadata string for `username`: a JSON-encoded `[["text/plain", ...]]`.
    pub fn metadata(&self, username: &str) -> String {
        let description = format!("Paying to {}@{}", username, self.domain);
        serde_json::json!([["text/plain", description]]).to_string()
    }
}

/// First-step response: what a payer may send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequestResponse {
    /// Always `"OK"` when produced by this server.
    #[serde(default)]
    pub status: Option<String>,
    /// Maximum comment length.
    #[serde(default)]
    pub comment_allowed: u32,
    /// Where to send the amount-bearing second request.
    pub callback: String,
    /// Maximum amount in millisatoshis.
    pub max_sendable: u64,
    /// Minimum amount in millisatoshis.
    pub min_sendable: u64,
    /// JSON-encoded metadata array.
    pub metadata: String,
    /// Always `"payRequest"`.
    pub tag: String,
}

/// Acknowledgement shown by the payer's wallet after payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessAction {
    /// Always `"message"`.
    pub tag: String,
    /// Text to display.
    pub message: String,
}

impl SuccessAction {
    /// A plain message action.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            tag: "message".to_string(),
            message: message.into(),
        }
    }
}

/// Second-step success: the invoice to pay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    /// `"OK"`.
    #[serde(default)]
    pub status: Option<String>,
    /// BOLT11 invoice.
    pub pr: String,
    /// Always empty.
    #[serde(default)]
    pub routes: Vec<serde_json::Value>,
    /// Whether the payer may forget this invoice.
    #[serde(default)]
    pub disposable: bool,
    /// What to show after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_action: Option<SuccessAction>,
}

/// LNURL error body: `{"status":"ERROR","reason":...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LnurlErrorResponse {
    /// `"ERROR"`.
    pub status: String,
    /// Human-readable reason.
    pub reason: String,
}

impl LnurlErrorResponse {
    /// Error body with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            reason: reason.into(),
        }
    }
}

/// Either callback body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallbackResponse {
    /// Invoice issued.
    Invoice(InvoiceResponse),
    /// Request refused.
    Error(LnurlErrorResponse),
}
