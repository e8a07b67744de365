//! Create registrant table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrant::RegNo).string_len(64).not_null())
                    .col(ColumnDef::new(Registrant::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Registrant::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Registrant::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Registrant::College).string_len(256).not_null())
                    .col(ColumnDef::new(Registrant::Branch).string_len(128))
                    .col(
                        ColumnDef::new(Registrant::TransactionId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrant::ScreenshotUrl)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrant::AssignedQrId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrant::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Registrant::VerifiedBy).string_len(32))
                    .col(
                        ColumnDef::new(Registrant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: registration number is the business key
        manager
            .create_index(
                Index::create()
                    .name("idx_registrant_reg_no")
                    .table(Registrant::Table)
                    .col(Registrant::RegNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status (dashboards list by lifecycle state)
        manager
            .create_index(
                Index::create()
                    .name("idx_registrant_status")
                    .table(Registrant::Table)
                    .col(Registrant::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_registrant_created_at")
                    .table(Registrant::Table)
                    .col(Registrant::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Registrant {
    Table,
    Id,
    RegNo,
    Name,
    Email,
    Phone,
    College,
    Branch,
    TransactionId,
    ScreenshotUrl,
    AssignedQrId,
    Status,
    VerifiedBy,
    CreatedAt,
}
