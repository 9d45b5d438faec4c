use std::sync::Arc;

use models::order::OrderStatus;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::payment::{signature, PaymentGateway, RemoteOrder};

use super::domain::{self, build_checkout_plan, OversellPolicy};
use super::errors::CheckoutError;
use super::repository::{CheckoutRepository, LocalOrder};

/// Two-phase checkout orchestrator.
///
/// Phase 1 registers the order with the payment provider and records it
/// locally as PENDING. Phase 2 verifies the provider's signature and applies
/// the purchase in one atomic commit.
pub struct CheckoutService<R: CheckoutRepository, G: PaymentGateway> {
    repo: Arc<R>,
    gateway: Arc<G>,
    signing_secret: String,
    currency: String,
    oversell: OversellPolicy,
}

impl<R: CheckoutRepository, G: PaymentGateway> CheckoutService<R, G> {
    pub fn new(
        repo: Arc<R>,
        gateway: Arc<G>,
        signing_secret: impl Into<String>,
        currency: impl Into<String>,
        oversell: OversellPolicy,
    ) -> Self {
        Self {
            repo,
            gateway,
            signing_secret: signing_secret.into(),
            currency: currency.into(),
            oversell,
        }
    }

    /// Phase 1: register an order with the provider, then record it locally.
    ///
    /// The local row is keyed by the provider's order id and written only
    /// after the remote call succeeds, so no orphan local orders exist.
    #[instrument(skip(self), fields(user_id = %user_id, total = %total_amount))]
    pub async fn create_order(
        &self,
        user_id: Uuid,
        total_amount: Decimal,
    ) -> Result<RemoteOrder, CheckoutError> {
        if total_amount <= Decimal::ZERO {
            return Err(CheckoutError::Amount("order total must be positive".into()));
        }
        let amount_minor = domain::minor_units(total_amount)?;
        let receipt = domain::receipt_id();
        let remote = self
            .gateway
            .create_order(amount_minor, &self.currency, &receipt)
            .await?;
        let local = self
            .repo
            .insert_pending_order(&remote.id, user_id, total_amount)
            .await?;
        info!(order_id = %local.order_id, amount_minor, "order_created");
        Ok(remote)
    }

    /// Phase 2: verify the payment signature and apply the purchase.
    ///
    /// A bad signature is a verification *result* (`Ok(false)`), not an
    /// error, and touches no state. A missing local order is a logic error.
    /// Replaying a valid signature against an order that already left
    /// PENDING is rejected without touching stock or the cart.
    #[instrument(skip(self, signature_hex), fields(order_id = %order_id, user_id = %user_id))]
    pub async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature_hex: &str,
        user_id: Uuid,
    ) -> Result<bool, CheckoutError> {
        if !signature::verify(&self.signing_secret, order_id, payment_id, signature_hex) {
            warn!("payment signature mismatch");
            return Ok(false);
        }

        let order: LocalOrder = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;
        // An order id belonging to someone else is unknown as far as this
        // caller is concerned.
        if order.user_id != user_id {
            return Err(CheckoutError::OrderNotFound(order_id.to_string()));
        }
        if order.status != OrderStatus::Pending {
            warn!(status = ?order.status, "verification replay rejected");
            return Err(CheckoutError::AlreadyProcessed(order_id.to_string()));
        }

        let cart = self.repo.cart_items_with_products(user_id).await?;
        let plan = build_checkout_plan(&cart, self.oversell)?;
        self.repo.commit_checkout(order_id, user_id, &plan).await?;
        info!(lines = plan.lines.len(), total = %plan.total_amount, "checkout_committed");
        Ok(true)
    }
}
