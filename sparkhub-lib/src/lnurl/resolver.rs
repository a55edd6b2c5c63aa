//! Server side of LNURL-pay.
//!
//! ```text
//! RequestMetadata ──▶ AwaitingCallback ──┬──▶ Resolved { invoice }
//!                                        └──▶ Rejected(reason)
//! ```
//!
//! The metadata step is pure. The callback step resolves the target
//! address, decodes it to an identity key and asks the wallet for a single
//! invoice. It never mutates the registry, so repeating a callback only
//! issues another invoice.

use std::fmt;
use std::sync::Arc;

use super::types::{
    CallbackResponse, InvoiceResponse, LnurlConfig, LnurlErrorResponse, PayRequestResponse,
    SuccessAction, PAY_REQUEST_TAG, STATUS_OK,
};
use crate::address::AddressCodec;
use crate::registry::AddressRegistry;
use crate::wallet::ReadyWallet;
use crate::Result;

/// Memo used when the payer sends no comment.
pub const DEFAULT_MEMO: &str = "Invoice";

/// Why a callback was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// `username` or `amount` missing.
    MissingParameters,
    /// `amount` is not a whole number of millisatoshis.
    InvalidAmount,
    /// Comment exceeds `commentAllowed`.
    CommentTooLong,
    /// No registry entry for the username.
    UsernameNotFound,
    /// Address decoding or the wallet failed.
    InvoiceCreationFailed,
}

impl RejectReason {
    /// Reason text sent to the payer.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingParameters => "Missing required parameters",
            Self::InvalidAmount => "Invalid amount",
            Self::CommentTooLong => "Comment is too long",
            Self::UsernameNotFound => "Username not found",
            Self::InvoiceCreationFailed => "Failed to create invoice",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Terminal state of a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// An invoice was issued.
    Resolved {
        /// BOLT11 invoice
        invoice: String,
        /// Acknowledgement for the payer
        message: String,
    },
    /// The request was refused.
    Rejected(RejectReason),
}

impl CallbackOutcome {
    /// LNURL response body for this outcome.
    pub fn into_response(self) -> CallbackResponse {
        match self {
            Self::Resolved { invoice, message } => CallbackResponse::Invoice(InvoiceResponse {
                status: Some(STATUS_OK.to_string()),
                pr: invoice,
                routes: Vec::new(),
                disposable: false,
                success_action: Some(SuccessAction::message(message)),
            }),
            Self::Rejected(reason) => {
                CallbackResponse::Error(LnurlErrorResponse::new(reason.message()))
            }
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolves LNURL-pay requests for registered usernames and raw addresses.
#[derive(Clone)]
pub struct PaymentResolver {
    config: LnurlConfig,
    registry: Arc<dyn AddressRegistry>,
    wallet: ReadyWallet,
    codec: AddressCodec,
}

impl PaymentResolver {
    /// Build a resolver. The wallet must already be initialized.
    pub fn new(
        config: LnurlConfig,
        registry: Arc<dyn AddressRegistry>,
        wallet: ReadyWallet,
        codec: AddressCodec,
    ) -> Self {
        Self {
            config,
            registry,
            wallet,
            codec,
        }
    }

    /// LNURL parameters in use.
    pub fn config(&self) -> &LnurlConfig {
        &self.config
    }

    /// First step: metadata for `username`.
    pub fn pay_request(&self, username: &str) -> PayRequestResponse {
        PayRequestResponse {
            status: Some(STATUS_OK.to_string()),
            comment_allowed: self.config.comment_allowed,
            callback: self.config.callback_url(username),
            max_sendable: self.config.max_sendable,
            min_sendable: self.config.min_sendable,
            metadata: self.config.metadata(username),
            tag: PAY_REQUEST_TAG.to_string(),
        }
    }

    /// Second step: issue an invoice for `amount` millisatoshis.
    ///
    /// Parameter problems are rejected before the registry or codec is
    /// touched. Registry storage failures are returned as errors; every
    /// codec or wallet failure becomes `InvoiceCreationFailed`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, comment)))]
    pub async fn callback(
        &self,
        username: Option<&str>,
        amount: Option<&str>,
        comment: Option<&str>,
    ) -> Result<CallbackOutcome> {
        let (Some(username), Some(amount)) = (present(username), present(amount)) else {
            return Ok(CallbackOutcome::Rejected(RejectReason::MissingParameters));
        };

        let Ok(amount_msat) = amount.trim().parse::<u64>() else {
            return Ok(CallbackOutcome::Rejected(RejectReason::InvalidAmount));
        };

        if let Some(comment) = comment {
            if comment.chars().count() > self.config.comment_allowed as usize {
                return Ok(CallbackOutcome::Rejected(RejectReason::CommentTooLong));
            }
        }

        let address = if self.codec.is_recognized_address(username) {
            username.to_string()
        } else {
            match self.registry.lookup_address(username).await? {
                Some(address) => address,
                None => return Ok(CallbackOutcome::Rejected(RejectReason::UsernameNotFound)),
            }
        };

        let Ok(pubkey_hex) = self.codec.decode_to_pubkey_hex(&address) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(username, "registered address does not decode");
            return Ok(CallbackOutcome::Rejected(
                RejectReason::InvoiceCreationFailed,
            ));
        };

        let amount_sats = amount_msat / 1000;
        let memo = comment.unwrap_or(DEFAULT_MEMO);

        match self
            .wallet
            .create_invoice_for_pubkey(&pubkey_hex, amount_sats, memo)
            .await
        {
            Ok(invoice) => {
                #[cfg(feature = "tracing")]
                tracing::info!(username, amount_sats, "invoice issued");
                Ok(CallbackOutcome::Resolved {
                    invoice,
                    message: format!(
                        "Payment received! Thank you for your payment to {}.",
                        username
                    ),
                })
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(username, "invoice creation failed: {err}");
                #[cfg(not(feature = "tracing"))]
                let _ = err;
                Ok(CallbackOutcome::Rejected(
                    RejectReason::InvoiceCreationFailed,
                ))
            }
        }
    }
}
