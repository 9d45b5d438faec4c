use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use migration::MigratorTrait;

use server::routes;
use server::state::ServerState;
use service::auth::revocation::SeaOrmRevocationStore;
use service::auth::TokenService;
use service::checkout::repo::seaorm::SeaOrmCheckoutRepository;
use service::checkout::{CheckoutService, OversellPolicy};
use service::payment::{HttpPaymentGateway, RetryPolicy};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

/// Build the app against a real database, or `None` to skip the test when
/// the database is unreachable.
pub async fn build_app() -> anyhow::Result<Option<Router>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(None);
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return Ok(None);
    }

    let tokens = TokenService::new("test-secret", 3600);
    let revocations = Arc::new(SeaOrmRevocationStore { db: db.clone() });
    // never reached in these tests; points at a closed port
    let gateway = Arc::new(HttpPaymentGateway::new(
        "http://127.0.0.1:1",
        "rzp_test",
        "test_key_secret",
        Duration::from_secs(1),
        RetryPolicy::new(1, Duration::from_millis(1), Duration::from_millis(5)),
    )?);
    let checkout_repo = Arc::new(SeaOrmCheckoutRepository { db: db.clone() });
    let checkout = Arc::new(CheckoutService::new(
        checkout_repo,
        gateway,
        "test_key_secret",
        "INR",
        OversellPolicy::ClampToZero,
    ));

    let state = ServerState { db, tokens, revocations, checkout };
    Ok(Some(routes::build_router(cors(), state)))
}
