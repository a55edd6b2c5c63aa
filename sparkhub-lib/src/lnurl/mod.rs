//! Lightning Address (LNURL-pay) support.
//!
//! - [`PaymentResolver`]: the server side, turning `username@domain` into
//!   invoices for the registered Spark identity.
//! - [`LnurlClient`]: the payer side, for resolving any Lightning Address.

mod client;
mod resolver;
mod types;

pub use client::{check_payment, LightningAddress, LnurlClient, DEFAULT_TIMEOUT_SECS};
pub use resolver::{CallbackOutcome, PaymentResolver, RejectReason, DEFAULT_MEMO};
pub use types::{
    CallbackResponse, InvoiceResponse, LnurlConfig, LnurlErrorResponse, PayRequestResponse,
    SuccessAction, PAY_REQUEST_TAG, STATUS_ERROR, STATUS_OK,
};
