use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use service::auth::domain::AuthUser;
use service::cart;
use service::payment::RemoteOrder;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
pub struct VerifyInput {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Phase 1: compute the cart total from current DB prices and register an
/// order with the payment provider.
#[utoipa::path(post, path = "/api/checkout/order", tag = "checkout",
    responses(
        (status = 200, description = "Order created"),
        (status = 400, description = "Empty cart"),
        (status = 502, description = "Provider unavailable")
    ))]
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RemoteOrder>, ApiError> {
    let items = cart::list_items(&state.db, user.id).await?;
    if items.is_empty() {
        return Err(ApiError::bad_request("cart is empty"));
    }
    let total = items.iter().map(|l| l.line_total).sum();
    let remote = state.checkout.create_order(user.id, total).await?;
    Ok(Json(remote))
}

/// Phase 2: verify the provider's payment signature and, on success, apply
/// the purchase atomically.
#[utoipa::path(post, path = "/api/checkout/verify", tag = "checkout",
    request_body = crate::openapi::VerifyPaymentRequest,
    responses((status = 200, description = "Verification result")))]
pub async fn verify_payment(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<VerifyInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ok = state
        .checkout
        .verify_payment(&input.order_id, &input.payment_id, &input.signature, user.id)
        .await?;
    if ok {
        Ok(Json(serde_json::json!({"status": "success", "message": "payment verified"})))
    } else {
        Ok(Json(serde_json::json!({"status": "failed", "message": "signature mismatch"})))
    }
}
