//! Create `revoked_token` table: jti denylist backing logout.
//! Rows become dead weight once `expires_at` passes and may be purged.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevokedToken::Table)
                    .if_not_exists()
                    .col(string_len(RevokedToken::Jti, 64).primary_key())
                    .col(timestamp_with_time_zone(RevokedToken::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone(RevokedToken::RevokedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RevokedToken::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RevokedToken { Table, Jti, ExpiresAt, RevokedAt }
