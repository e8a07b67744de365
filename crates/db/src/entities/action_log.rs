//! Append-only audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One administrative action.
///
/// Write-only from the application's point of view: rows are never updated
/// or deleted. `registrant_id` may reference a row that was since deleted
/// (rejections remove the registrant but keep the log entry).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "action_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub registrant_id: Option<String>,

    pub admin_id: String,

    /// Free-form action tag, e.g. "APPROVE_PAYMENT".
    pub action: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
