//! Create admin session table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminSession::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminSession::AdminId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminSession::Token).string_len(64).not_null())
                    .col(
                        ColumnDef::new(AdminSession::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminSession::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_session_token")
                    .table(AdminSession::Table)
                    .col(AdminSession::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_session_admin_id")
                    .table(AdminSession::Table)
                    .col(AdminSession::AdminId)
                    .to_owned(),
            )
            .await?;

        // Index: expiry reaping
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_session_expires_at")
                    .table(AdminSession::Table)
                    .col(AdminSession::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminSession::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdminSession {
    Table,
    Id,
    AdminId,
    Token,
    CreatedAt,
    ExpiresAt,
}
