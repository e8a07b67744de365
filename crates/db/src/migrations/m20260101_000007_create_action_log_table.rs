//! Create action log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActionLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActionLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    // Nullable: rejected registrants are deleted but their
                    // log entries remain
                    .col(ColumnDef::new(ActionLog::RegistrantId).string_len(32))
                    .col(ColumnDef::new(ActionLog::AdminId).string_len(32).not_null())
                    .col(ColumnDef::new(ActionLog::Action).string_len(64).not_null())
                    .col(
                        ColumnDef::new(ActionLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_action_log_registrant_id")
                    .table(ActionLog::Table)
                    .col(ActionLog::RegistrantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_action_log_created_at")
                    .table(ActionLog::Table)
                    .col(ActionLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActionLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ActionLog {
    Table,
    Id,
    RegistrantId,
    AdminId,
    Action,
    CreatedAt,
}
