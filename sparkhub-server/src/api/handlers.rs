//! REST API handlers for the SparkHub server.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use sparkhub_lib::lnurl::{CallbackResponse, LnurlErrorResponse, PayRequestResponse, RejectReason};
use sparkhub_lib::registry::{AddressRegistry, ClaimOutcome};
use sparkhub_lib::PaymentResolver;
use tracing::{error, info};

use crate::api::types::*;
use crate::error::{ApiError, Result};

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: PaymentResolver,
    pub registry: Arc<dyn AddressRegistry>,
}

/// Health check endpoint.
///
/// # Endpoint
/// `GET /ping`
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "SparkHub is running".to_string(),
    })
}

/// LNURL-pay metadata.
///
/// # Endpoint
/// `GET /.well-known/lnurlp/{username}`
///
/// The response does not depend on whether `username` is registered; unknown
/// names are rejected at the callback.
pub async fn pay_request(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<PayRequestResponse> {
    Json(state.resolver.pay_request(&username))
}

/// LNURL-pay callback.
///
/// # Endpoint
/// `GET /api/lightning-address/{username}/callback?amount=<msat>&comment=<text>`
///
/// # Returns
/// Always `200 OK`, with either an invoice body or `{"status":"ERROR","reason":...}`.
pub async fn pay_callback(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Json<CallbackResponse> {
    let outcome = state
        .resolver
        .callback(
            Some(username.as_str()),
            query.amount.as_deref(),
            query.comment.as_deref(),
        )
        .await;

    match outcome {
        Ok(outcome) => Json(outcome.into_response()),
        Err(e) => {
            error!(%username, "callback failed: {}", e);
            Json(CallbackResponse::Error(LnurlErrorResponse::new(
                RejectReason::InvoiceCreationFailed.message(),
            )))
        }
    }
}

/// Associate a username with a Spark address.
///
/// # Endpoint
/// `POST /api/users`
///
/// # Request Body
/// [`CreateUserRequest`]: `username` and `address` (or `sparkAddress`).
///
/// # Returns
/// - `200 OK` with [`UserResponse`] on success
/// - `400 Bad Request` for missing or invalid fields
/// - `409 Conflict` if the username or the address is taken
pub async fn create_user(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let (Some(username), Some(address)) = (
        req.username.filter(|u| !u.is_empty()),
        req.address.filter(|a| !a.is_empty()),
    ) else {
        return Err(ApiError::InvalidRequest(
            "Username and spark address are required".to_string(),
        ));
    };

    match state.registry.claim(&username, &address).await? {
        ClaimOutcome::Claimed(record) => {
            info!(username = %record.username, "user registered");
            Ok(Json(
                UserResponse::new(record.username, record.address)
                    .with_message("Username successfully associated with spark address"),
            ))
        }
        ClaimOutcome::Conflict(conflict) => Err(conflict.into()),
    }
}

/// Re-associate an existing username with a new Spark address.
///
/// # Endpoint
/// `PUT /api/users/{username}`
///
/// # Returns
/// - `200 OK` with [`UserResponse`]
/// - `404 Not Found` if the username is not registered
/// - `409 Conflict` if the address belongs to another username
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let Some(address) = req.address.filter(|a| !a.is_empty()) else {
        return Err(ApiError::InvalidRequest("Spark address is required".to_string()));
    };

    let record = state.registry.reassign(&username, &address).await?;
    info!(username = %record.username, "user address updated");
    Ok(Json(
        UserResponse::new(record.username, record.address)
            .with_message("Spark address updated"),
    ))
}

/// Look up the address for a username.
///
/// # Endpoint
/// `GET /api/users/{username}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    match state.registry.lookup_address(&username).await? {
        Some(address) => Ok(Json(UserResponse::new(username, address))),
        None => Err(ApiError::UsernameNotFound(username)),
    }
}

/// Look up the username for a Spark address.
///
/// # Endpoint
/// `GET /api/users/by-address/{address}` (also `/api/users/by-spark-address/{address}`)
pub async fn get_user_by_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<UserResponse>> {
    match state.registry.lookup_username(&address).await? {
        Some(username) => Ok(Json(UserResponse::new(username, address))),
        None => Err(ApiError::AddressNotFound(address)),
    }
}
