//! Two-phase checkout: register an order with the payment provider, then
//! verify the payment signature and apply the purchase atomically.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{build_checkout_plan, CartLine, CheckoutPlan, OrderLine, OversellPolicy};
pub use errors::CheckoutError;
pub use service::CheckoutService;
