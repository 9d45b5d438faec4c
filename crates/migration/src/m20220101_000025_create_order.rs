//! Create `order` table.
//!
//! Primary key is the processor-assigned order id (a string), so a local row
//! can only exist once the remote order has been created.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(string_len(Order::OrderId, 64).primary_key())
                    .col(uuid(Order::UserId).not_null())
                    .col(decimal_len(Order::TotalAmount, 12, 2).not_null())
                    .col(string_len(Order::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Order::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Order::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Order { Table, OrderId, UserId, TotalAmount, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
