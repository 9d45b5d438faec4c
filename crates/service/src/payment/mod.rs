//! Payment processor integration: HTTP gateway client, retry policy, and
//! webhook-style signature verification.

pub mod gateway;
pub mod retry;
pub mod signature;

pub use gateway::{HttpPaymentGateway, PaymentError, PaymentGateway, RemoteOrder};
pub use retry::RetryPolicy;
