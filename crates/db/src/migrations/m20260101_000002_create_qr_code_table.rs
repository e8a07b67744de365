//! Create QR code table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QrCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCode::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrCode::UpiId).string_len(256).not_null())
                    .col(
                        ColumnDef::new(QrCode::QrImageUrl)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QrCode::DailyLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QrCode::TodayUsage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QrCode::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(QrCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: assignment scans active codes ordered by usage
        manager
            .create_index(
                Index::create()
                    .name("idx_qr_code_active_usage")
                    .table(QrCode::Table)
                    .col(QrCode::Active)
                    .col(QrCode::TodayUsage)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QrCode::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum QrCode {
    Table,
    Id,
    UpiId,
    QrImageUrl,
    DailyLimit,
    TodayUsage,
    Active,
    CreatedAt,
}
