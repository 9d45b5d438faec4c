pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod product;
pub mod cart_item;
pub mod order;
pub mod order_item;
pub mod revoked_token;

#[cfg(test)]
mod tests;
