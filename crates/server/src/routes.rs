use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::state::ServerState;
use crate::{auth, cart, catalog, checkout, gate, openapi};

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Liveness probe")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth routes, customer routes
/// behind the gate, admin routes behind the gate's admin prefix.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    let auth_routes = Router::new()
        .route("/api/users/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    let customer = Router::new()
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/:id", get(catalog::get_product))
        .route("/api/cart", get(cart::list).delete(cart::clear))
        .route("/api/cart/items", post(cart::add_item).put(cart::update_item))
        .route("/api/cart/items/:product_id", delete(cart::remove_item))
        .route("/api/cart/count", get(cart::count))
        .route("/api/checkout/order", post(checkout::create_order))
        .route("/api/checkout/verify", post(checkout::verify_payment));

    let admin = Router::new()
        .route("/admin/products", post(catalog::create_product))
        .route("/admin/products/:id", delete(catalog::delete_product))
        .route("/admin/products/:id/stock", put(catalog::update_stock))
        .route("/admin/products/:id/price", put(catalog::update_price));

    public
        .merge(auth_routes)
        .merge(customer)
        .merge(admin)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), gate::require_auth))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
