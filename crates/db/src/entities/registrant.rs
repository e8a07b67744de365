//! Registrant entity: one row per submitted registration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment verification lifecycle of a registrant.
///
/// `Rejected` never persists in the live table: a rejected row is deleted
/// right after the transition commits, leaving only its action log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "VERIFYING")]
    Verifying,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// A participant who submitted the registration form.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Registration number (unique business key).
    #[sea_orm(unique)]
    pub reg_no: String,

    pub name: String,

    pub email: String,

    pub phone: String,

    pub college: String,

    /// Branch/department (optional).
    #[sea_orm(nullable)]
    pub branch: Option<String>,

    /// UPI transaction reference supplied by the registrant.
    pub transaction_id: String,

    /// Durable URL of the uploaded payment screenshot.
    pub screenshot_url: String,

    /// QR code this registrant was asked to pay against.
    pub assigned_qr_id: String,

    pub status: RegistrationStatus,

    /// Admin currently holding the verification claim.
    /// Non-null only while `status` is `Verifying`.
    #[sea_orm(nullable)]
    pub verified_by: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_code::Entity",
        from = "Column::AssignedQrId",
        to = "super::qr_code::Column::Id"
    )]
    QrCode,
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
