use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::revocation::RevocationStore;
use service::auth::TokenService;
use service::checkout::repo::seaorm::SeaOrmCheckoutRepository;
use service::checkout::CheckoutService;
use service::payment::HttpPaymentGateway;

/// Shared application state handed to every handler and the gate middleware.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub revocations: Arc<dyn RevocationStore>,
    pub checkout: Arc<CheckoutService<SeaOrmCheckoutRepository, HttpPaymentGateway>>,
}
