//! Create `order_item` table: immutable purchase-time snapshots owned by an
//! order (cascade delete).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(uuid(OrderItem::Id).primary_key())
                    .col(string_len(OrderItem::OrderId, 64).not_null())
                    .col(uuid(OrderItem::ProductId).not_null())
                    .col(integer(OrderItem::Quantity).not_null())
                    .col(decimal_len(OrderItem::PricePerUnit, 12, 2).not_null())
                    .col(decimal_len(OrderItem::TotalPrice, 12, 2).not_null())
                    .col(timestamp_with_time_zone(OrderItem::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
                            .to(Order::Table, Order::OrderId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderItem { Table, Id, OrderId, ProductId, Quantity, PricePerUnit, TotalPrice, CreatedAt }

#[derive(DeriveIden)]
enum Order { Table, OrderId }
