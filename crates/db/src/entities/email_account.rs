//! Sender email account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An SMTP account used for outgoing notifications.
///
/// Active accounts form an ordered fallback pool (creation order); the
/// dispatcher tries each in turn until one send succeeds.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email_address: String,

    pub smtp_host: String,

    pub smtp_port: i32,

    /// Provider app password. Never serialized to API responses.
    #[serde(skip_serializing)]
    pub app_password: String,

    pub active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
