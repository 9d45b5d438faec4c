use thiserror::Error;
use uuid::Uuid;

use crate::payment::PaymentError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    /// A verified payment references an order we never recorded. This is a
    /// logic error, not a failed verification.
    #[error("order not found: {0}")]
    OrderNotFound(String),
    /// A valid signature arrived for an order that already left PENDING —
    /// a replayed or duplicate verification.
    #[error("order already processed: {0}")]
    AlreadyProcessed(String),
    #[error("insufficient stock for product {0}")]
    Oversold(Uuid),
    #[error("invalid amount: {0}")]
    Amount(String),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("checkout repository error: {0}")]
    Repository(String),
}
