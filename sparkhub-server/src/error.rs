//! Error types for the SparkHub server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sparkhub_lib::registry::ClaimConflict;
use sparkhub_lib::SparkhubError;

/// User API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Username {0} already exists")]
    UsernameTaken(String),

    #[error("Spark address is already associated with another username")]
    AddressClaimed {
        address: String,
        existing_username: String,
    },

    #[error("Username {0} not found")]
    UsernameNotFound(String),

    #[error("No username found for spark address: {0}")]
    AddressNotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    /// Holds the underlying failure for the log; clients only see a
    /// generic message.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Error code string for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::AddressClaimed { .. } => "ADDRESS_CLAIMED",
            Self::UsernameNotFound(_) | Self::AddressNotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UsernameTaken(_) | Self::AddressClaimed { .. } => StatusCode::CONFLICT,
            Self::UsernameNotFound(_) | Self::AddressNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClaimConflict> for ApiError {
    fn from(conflict: ClaimConflict) -> Self {
        match conflict {
            ClaimConflict::UsernameTaken { username } => Self::UsernameTaken(username),
            ClaimConflict::AddressClaimed {
                address,
                existing_username,
            } => Self::AddressClaimed {
                address,
                existing_username,
            },
        }
    }
}

impl From<SparkhubError> for ApiError {
    fn from(err: SparkhubError) -> Self {
        match err {
            SparkhubError::UsernameTaken { username } => Self::UsernameTaken(username),
            SparkhubError::AddressClaimed {
                address,
                existing_username,
            } => Self::AddressClaimed {
                address,
                existing_username,
            },
            SparkhubError::NotFound { identifier, .. } => Self::UsernameNotFound(identifier),
            SparkhubError::InvalidData { field, reason } => {
                Self::InvalidRequest(format!("Invalid {}: {}", field, reason))
            }
            SparkhubError::MissingParameters => {
                Self::InvalidRequest("Missing required parameters".to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// JSON error body: `{"status":"error","message":...}` plus conflict detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_username: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Internal(detail) = &self {
            tracing::error!("request failed: {}", detail);
        }

        let (address, existing_username) = match &self {
            Self::AddressClaimed {
                address,
                existing_username,
            } => (Some(address.clone()), Some(existing_username.clone())),
            _ => (None, None),
        };
        let body = ErrorResponse {
            status: "error",
            code: self.code(),
            message: self.to_string(),
            spark_address: address.clone(),
            address,
            existing_username,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
