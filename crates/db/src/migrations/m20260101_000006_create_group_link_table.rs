//! Create group link table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupLink::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GroupLink::College).string_len(8).not_null())
                    .col(
                        ColumnDef::new(GroupLink::WhatsappLink)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupLink::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GroupLink::CreatedAt)
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
                    .name("idx_group_link_college_active")
                    .table(GroupLink::Table)
                    .col(GroupLink::College)
                    .col(GroupLink::Active)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GroupLink {
    Table,
    Id,
    College,
    WhatsappLink,
    Active,
    CreatedAt,
}
