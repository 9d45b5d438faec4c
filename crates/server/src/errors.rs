use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::auth::errors::AuthError;
use service::checkout::CheckoutError;
use service::errors::ServiceError;

/// HTTP-facing error: a status plus a client-safe message.
///
/// 5xx causes are logged here; the response body never carries internals.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "internal server error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::bad_request(msg),
            AuthError::Conflict => ApiError::conflict("user already exists"),
            AuthError::NotFound => ApiError::not_found("user not found"),
            AuthError::Unauthorized => ApiError::unauthorized("invalid credentials"),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                ApiError::internal(e)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::bad_request(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Db(_) => ApiError::internal(e),
            ServiceError::Model(m) => match m {
                models::errors::ModelError::Validation(msg) => ApiError::bad_request(msg),
                models::errors::ModelError::Db(msg) => ApiError::internal(msg),
            },
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => ApiError::bad_request("cart is empty"),
            CheckoutError::Amount(msg) => ApiError::bad_request(msg),
            CheckoutError::Oversold(id) => {
                ApiError::conflict(format!("insufficient stock for product {}", id))
            }
            CheckoutError::AlreadyProcessed(_) => ApiError::conflict("order already processed"),
            // A verified payment pointing at an order we never recorded is a
            // server-side inconsistency, not a client mistake.
            CheckoutError::OrderNotFound(_) => ApiError::internal(e),
            CheckoutError::Payment(_) => {
                error!(error = %e, "payment provider failure");
                ApiError::new(StatusCode::BAD_GATEWAY, "payment provider unavailable")
            }
            CheckoutError::Repository(_) => ApiError::internal(e),
        }
    }
}
