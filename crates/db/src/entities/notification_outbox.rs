//! Notification outbox entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which template the intent should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum NotificationKind {
    #[sea_orm(string_value = "APPROVAL")]
    Approval,
    #[sea_orm(string_value = "REJECTION")]
    Rejection,
}

/// Delivery state of an outbox intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum OutboxStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "SENT")]
    Sent,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    /// The transition this intent belonged to turned out to be a no-op.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// A persisted notification intent.
///
/// Written before the status transition is applied, so every transition's
/// side effects are observable and replayable. Recipient fields are
/// snapshots: rejection deletes the registrant row but the intent must
/// still be deliverable.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_outbox")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub registrant_id: Option<String>,

    pub kind: NotificationKind,

    pub recipient_email: String,

    pub recipient_name: String,

    /// College string as submitted; classified at dispatch time.
    pub college: String,

    pub status: OutboxStatus,

    pub attempts: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub processed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
