use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CartItem: composite unique (user_id, product_id) — one line per product
        manager
            .create_index(
                Index::create()
                    .name("uniq_cart_item_user_product")
                    .table(CartItem::Table)
                    .col(CartItem::UserId)
                    .col(CartItem::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // CartItem: index on user_id for cart listing / clearing
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_item_user")
                    .table(CartItem::Table)
                    .col(CartItem::UserId)
                    .to_owned(),
            )
            .await?;

        // Order: index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;

        // OrderItem: index on order_id
        manager
            .create_index(
                Index::create()
                    .name("idx_order_item_order")
                    .table(OrderItem::Table)
                    .col(OrderItem::OrderId)
                    .to_owned(),
            )
            .await?;

        // RevokedToken: index on expires_at for purge scans
        manager
            .create_index(
                Index::create()
                    .name("idx_revoked_token_expires")
                    .table(RevokedToken::Table)
                    .col(RevokedToken::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_cart_item_user_product").table(CartItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cart_item_user").table(CartItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_user").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_item_order").table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_revoked_token_expires").table(RevokedToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CartItem { Table, UserId, ProductId }

#[derive(DeriveIden)]
enum Order { Table, UserId }

#[derive(DeriveIden)]
enum OrderItem { Table, OrderId }

#[derive(DeriveIden)]
enum RevokedToken { Table, ExpiresAt }
