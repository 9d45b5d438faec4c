use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::http::HeaderValue;
use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::revocation::SeaOrmRevocationStore;
use service::auth::TokenService;
use service::checkout::repo::seaorm::SeaOrmCheckoutRepository;
use service::checkout::{CheckoutService, OversellPolicy};
use service::payment::{HttpPaymentGateway, RetryPolicy};

use crate::routes;
use crate::state::ServerState;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// CORS for the browser frontend: one fixed origin, credentials allowed so
/// the auth cookie travels with requests.
fn build_cors(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    use axum::http::{header, Method};
    let origin: HeaderValue = allowed_origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
}

/// Public entry: load config, wire services, and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect_with(
        &cfg.database.url,
        models::db::PoolSettings {
            max_connections: cfg.database.max_connections,
            min_connections: cfg.database.min_connections,
            connect_timeout: Duration::from_secs(cfg.database.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.database.acquire_timeout_secs),
            sqlx_logging: cfg.database.sqlx_logging,
        },
    )
    .await?;

    let tokens = TokenService::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_secs);
    let revocations = Arc::new(SeaOrmRevocationStore { db: db.clone() });

    let retry = RetryPolicy::new(
        cfg.payment.retry_max_attempts,
        Duration::from_millis(cfg.payment.retry_backoff_ms),
        Duration::from_secs(2),
    );
    let gateway = Arc::new(HttpPaymentGateway::new(
        &cfg.payment.base_url,
        &cfg.payment.key_id,
        &cfg.payment.key_secret,
        Duration::from_secs(cfg.payment.request_timeout_secs),
        retry,
    )?);
    let checkout_repo = Arc::new(SeaOrmCheckoutRepository { db: db.clone() });
    let checkout = Arc::new(CheckoutService::new(
        checkout_repo,
        gateway,
        cfg.payment.key_secret.clone(),
        cfg.payment.currency.clone(),
        OversellPolicy::parse(&cfg.payment.oversell_policy),
    ));

    let state = ServerState { db, tokens, revocations, checkout };

    let cors = build_cors(&cfg.auth.allowed_origin)?;
    let app: Router = routes::build_router(cors, state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
