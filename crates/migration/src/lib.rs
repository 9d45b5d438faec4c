//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000021_create_user;
mod m20220101_000022_create_user_credentials;
mod m20220101_000023_create_product;
mod m20220101_000024_create_cart_item;
mod m20220101_000025_create_order;
mod m20220101_000026_create_order_item;
mod m20220101_000027_create_revoked_token;
mod m20220101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000021_create_user::Migration),
            Box::new(m20220101_000022_create_user_credentials::Migration),
            Box::new(m20220101_000023_create_product::Migration),
            Box::new(m20220101_000024_create_cart_item::Migration),
            Box::new(m20220101_000025_create_order::Migration),
            Box::new(m20220101_000026_create_order_item::Migration),
            Box::new(m20220101_000027_create_revoked_token::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000002_add_indexes::Migration),
        ]
    }
}
