use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub username: String, pub password: String, pub role: Option<String> }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct CartItemRequest { pub product_id: Uuid, pub quantity: i32 }

#[derive(utoipa::ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

#[derive(utoipa::ToSchema)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::auth::register,
        crate::auth::login,
        crate::auth::logout,
        crate::cart::add_item,
        crate::cart::update_item,
        crate::cart::remove_item,
        crate::cart::list,
        crate::cart::count,
        crate::cart::clear,
        crate::catalog::list_products,
        crate::catalog::get_product,
        crate::catalog::create_product,
        crate::catalog::update_stock,
        crate::catalog::update_price,
        crate::catalog::delete_product,
        crate::checkout::create_order,
        crate::checkout::verify_payment,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CartItemRequest,
            CreateProductRequest,
            VerifyPaymentRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "cart"),
        (name = "catalog"),
        (name = "admin"),
        (name = "checkout")
    )
)]
pub struct ApiDoc;
