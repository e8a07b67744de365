//! Create email account table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailAccount::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmailAccount::EmailAddress)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailAccount::SmtpHost)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmailAccount::SmtpPort).integer().not_null())
                    .col(
                        ColumnDef::new(EmailAccount::AppPassword)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailAccount::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(EmailAccount::CreatedAt)
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
                    .name("idx_email_account_address")
                    .table(EmailAccount::Table)
                    .col(EmailAccount::EmailAddress)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmailAccount {
    Table,
    Id,
    EmailAddress,
    SmtpHost,
    SmtpPort,
    AppPassword,
    Active,
    CreatedAt,
}
