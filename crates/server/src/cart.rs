use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::AuthUser;
use service::cart::{self, CartLineView};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
pub struct CartItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Decimal,
}

#[utoipa::path(post, path = "/api/cart/items", tag = "cart",
    request_body = crate::openapi::CartItemRequest,
    responses((status = 200, description = "Item added"), (status = 404, description = "Unknown product")))]
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CartItemInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let line = cart::add_item(&state.db, user.id, input.product_id, input.quantity).await?;
    Ok(Json(serde_json::json!({
        "product_id": line.product_id,
        "quantity": line.quantity,
    })))
}

#[utoipa::path(put, path = "/api/cart/items", tag = "cart",
    request_body = crate::openapi::CartItemRequest,
    responses((status = 200, description = "Quantity updated")))]
pub async fn update_item(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CartItemInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let line = cart::update_quantity(&state.db, user.id, input.product_id, input.quantity).await?;
    Ok(Json(serde_json::json!({
        "product_id": line.product_id,
        "quantity": line.quantity,
    })))
}

#[utoipa::path(delete, path = "/api/cart/items/{product_id}", tag = "cart",
    responses((status = 200, description = "Item removed")))]
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    cart::remove_item(&state.db, user.id, product_id).await?;
    Ok(Json(serde_json::json!({"message": "item removed"})))
}

#[utoipa::path(get, path = "/api/cart", tag = "cart",
    responses((status = 200, description = "Cart contents")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CartView>, ApiError> {
    let items = cart::list_items(&state.db, user.id).await?;
    let total = items.iter().map(|l| l.line_total).sum();
    Ok(Json(CartView { items, total }))
}

/// Badge count: sum of quantities, not line count.
#[utoipa::path(get, path = "/api/cart/count", tag = "cart",
    responses((status = 200, description = "Total item count")))]
pub async fn count(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = cart::total_quantity(&state.db, user.id).await?;
    Ok(Json(serde_json::json!({"count": count})))
}

#[utoipa::path(delete, path = "/api/cart", tag = "cart",
    responses((status = 200, description = "Cart cleared")))]
pub async fn clear(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = cart::clear(&state.db, user.id).await?;
    Ok(Json(serde_json::json!({"removed": removed})))
}
