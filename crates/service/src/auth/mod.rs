//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Centralizes registration, login, token issuance, and logout revocation
//! under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod revocation;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
pub use token::TokenService;
