//! Payer side of LNURL-pay.
//!
//! Resolves `user@domain` Lightning Addresses against any LNURL-pay server,
//! including this one. Used by the CLI to fetch invoices.
//!
//! # Feature Flags
//!
//! Requires the `http-executor` feature for real HTTP requests. Without it
//! [`LnurlClient::fetch_pay_request`] and [`LnurlClient::request_invoice`]
//! return [`SparkhubError::Unimplemented`].

use std::fmt;
use std::str::FromStr;
#[cfg(feature = "http-executor")]
use std::time::Duration;

#[cfg(feature = "http-executor")]
use super::types::{CallbackResponse, PAY_REQUEST_TAG, STATUS_ERROR};
use super::types::PayRequestResponse;
use crate::{Result, SparkhubError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 9;

/// A parsed `user@domain` Lightning Address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightningAddress {
    /// Part before `@`.
    pub username: String,
    /// Part after `@`, may include a port.
    pub domain: String,
}

impl LightningAddress {
    /// Parse `user@domain`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let Some((username, domain)) = input.split_once('@') else {
            return Err(SparkhubError::invalid_data(
                "lightning_address",
                "expected user@domain",
            ));
        };
        if username.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(SparkhubError::invalid_data(
                "lightning_address",
                "expected user@domain",
            ));
        }
        if domain.contains('/') || username.contains('/') {
            return Err(SparkhubError::invalid_data(
                "lightning_address",
                "must not contain '/'",
            ));
        }
        Ok(Self {
            username: username.to_string(),
            domain: domain.to_ascii_lowercase(),
        })
    }

    /// Well-known LNURL-pay endpoint for this address.
    pub fn well_known_url(&self, scheme: &str) -> String {
        format!(
            "{}://{}/.well-known/lnurlp/{}",
            scheme, self.domain, self.username
        )
    }
}

impl FromStr for LightningAddress {
    type Err = SparkhubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LightningAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.domain)
    }
}

/// Check `amount_sats` and `comment` against a pay request.
pub fn check_payment(
    pay_request: &PayRequestResponse,
    amount_sats: u64,
    comment: Option<&str>,
) -> Result<u64> {
    let amount_msat = amount_sats
        .checked_mul(1000)
        .ok_or_else(|| SparkhubError::invalid_data("amount", "too large"))?;
    if amount_msat < pay_request.min_sendable || amount_msat > pay_request.max_sendable {
        return Err(SparkhubError::invalid_data(
            "amount",
            format!(
                "{} msat outside [{}, {}]",
                amount_msat, pay_request.min_sendable, pay_request.max_sendable
            ),
        ));
    }
    if let Some(comment) = comment {
        if comment.chars().count() > pay_request.comment_allowed as usize {
            return Err(SparkhubError::invalid_data(
                "comment",
                format!("at most {} characters", pay_request.comment_allowed),
            ));
        }
    }
    Ok(amount_msat)
}

/// LNURL-pay HTTP client.
pub struct LnurlClient {
    scheme: &'static str,
    #[cfg(feature = "http-executor")]
    client: reqwest::Client,
}

impl LnurlClient {
    /// Client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout_secs(DEFAULT_TIMEOUT_SECS)
    }

    /// Client with a custom timeout.
    pub fn with_timeout_secs(timeout_secs: u64) -> Result<Self> {
        #[cfg(feature = "http-executor")]
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SparkhubError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        #[cfg(not(feature = "http-executor"))]
        let _ = timeout_secs;

        Ok(Self {
            scheme: "https",
            #[cfg(feature = "http-executor")]
            client,
        })
    }

    /// Resolve well-known URLs over plain HTTP. Local development only.
    pub fn insecure(mut self) -> Self {
        self.scheme = "http";
        self
    }

    /// Scheme used for well-known lookups.
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// Fetch the pay request for `address`.
    #[cfg(feature = "http-executor")]
    pub async fn fetch_pay_request(&self, address: &LightningAddress) -> Result<PayRequestResponse> {
        let body = self.get_json(&address.well_known_url(self.scheme)).await?;
        if let Some(reason) = error_reason(&body) {
            return Err(SparkhubError::Upstream(reason));
        }

        let pay_request: PayRequestResponse = serde_json::from_value(body)?;
        if pay_request.tag != PAY_REQUEST_TAG {
            return Err(SparkhubError::invalid_data(
                "tag",
                format!("expected {}, got {}", PAY_REQUEST_TAG, pay_request.tag),
            ));
        }
        Ok(pay_request)
    }

    /// Fetch the pay request (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    pub async fn fetch_pay_request(&self, _address: &LightningAddress) -> Result<PayRequestResponse> {
        Err(SparkhubError::Unimplemented(
            "LNURL client (enable the 'http-executor' feature)",
        ))
    }

    /// Ask the pay request's callback for an invoice. Returns the BOLT11 string.
    #[cfg(feature = "http-executor")]
    pub async fn request_invoice(
        &self,
        pay_request: &PayRequestResponse,
        amount_sats: u64,
        comment: Option<&str>,
    ) -> Result<String> {
        let amount_msat = check_payment(pay_request, amount_sats, comment)?;

        let mut url = reqwest::Url::parse(&pay_request.callback)
            .map_err(|e| SparkhubError::invalid_data("callback", e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("amount", &amount_msat.to_string());
            if let Some(comment) = comment.filter(|c| !c.is_empty()) {
                query.append_pair("comment", comment);
            }
        }

        let body = self.get_json(url.as_str()).await?;
        match serde_json::from_value::<CallbackResponse>(body)? {
            CallbackResponse::Invoice(invoice) => Ok(invoice.pr),
            CallbackResponse::Error(error) => Err(SparkhubError::Upstream(error.reason)),
        }
    }

    /// Ask for an invoice (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    pub async fn request_invoice(
        &self,
        pay_request: &PayRequestResponse,
        amount_sats: u64,
        comment: Option<&str>,
    ) -> Result<String> {
        check_payment(pay_request, amount_sats, comment)?;
        Err(SparkhubError::Unimplemented(
            "LNURL client (enable the 'http-executor' feature)",
        ))
    }

    /// Both steps in one call.
    pub async fn invoice_for(
        &self,
        address: &LightningAddress,
        amount_sats: u64,
        comment: Option<&str>,
    ) -> Result<String> {
        let pay_request = self.fetch_pay_request(address).await?;
        self.request_invoice(&pay_request, amount_sats, comment).await
    }

    #[cfg(feature = "http-executor")]
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SparkhubError::ConnectionTimeout {
                    operation: "lnurl request".to_string(),
                    timeout_ms: DEFAULT_TIMEOUT_SECS * 1000,
                }
            } else if e.is_connect() {
                SparkhubError::ConnectionFailed {
                    target: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                SparkhubError::transport(e)
            }
        })?;

        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| SparkhubError::Serialization(format!("Invalid LNURL response: {}", e)))?;

        // LNURL servers may report errors with any status; prefer the body.
        if !status.is_success() && error_reason(&body).is_none() {
            return Err(SparkhubError::Upstream(format!(
                "LNURL server returned {}",
                status
            )));
        }
        Ok(body)
    }
}

#[cfg(feature = "http-executor")]
fn error_reason(body: &serde_json::Value) -> Option<String> {
    if body.get("status").and_then(|s| s.as_str()) != Some(STATUS_ERROR) {
        return None;
    }
    Some(
        body.get("reason")
            .and_then(|r| r.as_str())
            .unwrap_or("unknown error")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay_request() -> PayRequestResponse {
        PayRequestResponse {
            status: Some("OK".to_string()),
            comment_allowed: 10,
            callback: "https://sparkhub.example/api/lightning-address/alice/callback".to_string(),
            max_sendable: 1_000_000,
            min_sendable: 1_000,
            metadata: "[]".to_string(),
            tag: "payRequest".to_string(),
        }
    }

    #[test]
    fn test_parse_lightning_address() {
        let address = LightningAddress::parse("alice@SparkHub.Example").unwrap();
        assert_eq!(address.username, "alice");
        assert_eq!(address.domain, "sparkhub.example");
        assert_eq!(address.to_string(), "alice@sparkhub.example");
        assert_eq!(
            address.well_known_url("https"),
            "https://sparkhub.example/.well-known/lnurlp/alice"
        );

        for bad in ["alice", "@host", "alice@", "a@b@c", "a/b@host"] {
            assert!(LightningAddress::parse(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_check_payment_bounds() {
        let pr = pay_request();
        assert_eq!(check_payment(&pr, 1, None).unwrap(), 1000);
        assert_eq!(check_payment(&pr, 1000, None).unwrap(), 1_000_000);
        assert!(check_payment(&pr, 0, None).is_err());
        assert!(check_payment(&pr, 1001, None).is_err());
        assert!(check_payment(&pr, u64::MAX, None).is_err());
    }

    #[test]
    fn test_check_payment_comment() {
        let pr = pay_request();
        assert!(check_payment(&pr, 5, Some("0123456789")).is_ok());
        assert!(check_payment(&pr, 5, Some("01234567890")).is_err());
    }

    #[test]
    fn test_insecure_scheme() {
        let client = LnurlClient::new().unwrap();
        assert_eq!(client.scheme(), "https");
        assert_eq!(client.insecure().scheme(), "http");
    }
}
