//! Request and response bodies for the user API.

use serde::{Deserialize, Serialize};

/// `GET /ping` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

/// `POST /api/users` body. `sparkAddress` is accepted for `address`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "sparkAddress")]
    pub address: Option<String>,
}

/// `PUT /api/users/{username}` body.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "sparkAddress")]
    pub address: Option<String>,
}

/// Successful user lookup or claim.
///
/// The address is emitted under both `address` and `sparkAddress`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub username: String,
    pub address: String,
    pub spark_address: String,
}

impl UserResponse {
    pub fn new(username: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            status: "ok".to_string(),
            message: None,
            username: username.into(),
            spark_address: address.clone(),
            address,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// LNURL callback query. Unknown LUD parameters (`nonce`, `fromnodes`,
/// `proofofpayer`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub amount: Option<String>,
    pub comment: Option<String>,
}
