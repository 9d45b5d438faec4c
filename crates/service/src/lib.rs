//! Service layer providing business logic on top of models.
//! - Separates business rules from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod payment;
pub mod checkout;
#[cfg(test)]
pub mod test_support;
