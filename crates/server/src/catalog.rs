use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use models::product;
use service::catalog;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

#[derive(Deserialize)]
pub struct StockInput {
    pub stock: i32,
}

#[derive(Deserialize)]
pub struct PriceInput {
    pub price: Decimal,
}

#[utoipa::path(get, path = "/api/products", tag = "catalog",
    responses((status = 200, description = "Product list")))]
pub async fn list_products(
    State(state): State<ServerState>,
) -> Result<Json<Vec<product::Model>>, ApiError> {
    let products = catalog::list_products(&state.db).await?;
    Ok(Json(products))
}

#[utoipa::path(get, path = "/api/products/{id}", tag = "catalog",
    responses((status = 200, description = "Product"), (status = 404, description = "Not found")))]
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<product::Model>, ApiError> {
    let found = catalog::get_product(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))?;
    Ok(Json(found))
}

#[utoipa::path(post, path = "/admin/products", tag = "admin",
    request_body = crate::openapi::CreateProductRequest,
    responses((status = 200, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create_product(
    State(state): State<ServerState>,
    Json(input): Json<CreateProductInput>,
) -> Result<Json<product::Model>, ApiError> {
    let created = catalog::create_product(
        &state.db,
        &input.name,
        &input.description,
        input.price,
        input.stock,
    )
    .await?;
    Ok(Json(created))
}

#[utoipa::path(put, path = "/admin/products/{id}/stock", tag = "admin",
    responses((status = 200, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update_stock(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StockInput>,
) -> Result<Json<product::Model>, ApiError> {
    let updated = catalog::update_stock(&state.db, id, input.stock).await?;
    Ok(Json(updated))
}

#[utoipa::path(put, path = "/admin/products/{id}/price", tag = "admin",
    responses((status = 200, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update_price(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PriceInput>,
) -> Result<Json<product::Model>, ApiError> {
    let updated = catalog::update_price(&state.db, id, input.price).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/admin/products/{id}", tag = "admin",
    responses((status = 200, description = "Deleted")))]
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::delete_product(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "product deleted"})))
}
