//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_registrant_table;
mod m20260101_000002_create_qr_code_table;
mod m20260101_000003_create_admin_table;
mod m20260101_000004_create_admin_session_table;
mod m20260101_000005_create_email_account_table;
mod m20260101_000006_create_group_link_table;
mod m20260101_000007_create_action_log_table;
mod m20260101_000008_create_notification_outbox_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_registrant_table::Migration),
            Box::new(m20260101_000002_create_qr_code_table::Migration),
            Box::new(m20260101_000003_create_admin_table::Migration),
            Box::new(m20260101_000004_create_admin_session_table::Migration),
            Box::new(m20260101_000005_create_email_account_table::Migration),
            Box::new(m20260101_000006_create_group_link_table::Migration),
            Box::new(m20260101_000007_create_action_log_table::Migration),
            Box::new(m20260101_000008_create_notification_outbox_table::Migration),
        ]
    }
}
