//! Migration: Create api_key_usage_logs table.
//!
//! Audit rows copy the key name and masked value instead of referencing
//! api_keys, so they survive key deletion.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiKeyUsageLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiKeyUsageLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiKeyUsageLogs::KeyId).uuid().not_null())
                    .col(ColumnDef::new(ApiKeyUsageLogs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ApiKeyUsageLogs::KeyName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiKeyUsageLogs::KeyValue)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiKeyUsageLogs::Endpoint)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiKeyUsageLogs::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usage_logs_user_id_requested_at")
                    .table(ApiKeyUsageLogs::Table)
                    .col(ApiKeyUsageLogs::UserId)
                    .col(ApiKeyUsageLogs::RequestedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usage_logs_key_id")
                    .table(ApiKeyUsageLogs::Table)
                    .col(ApiKeyUsageLogs::KeyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ApiKeyUsageLogs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ApiKeyUsageLogs {
    Table,
    Id,
    KeyId,
    UserId,
    KeyName,
    KeyValue,
    Endpoint,
    RequestedAt,
}
