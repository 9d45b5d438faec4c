pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod errors;
pub mod gate;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
