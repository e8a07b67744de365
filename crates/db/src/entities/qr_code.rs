//! Payment QR code entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A payment collection channel with a daily usage cap.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// UPI address the QR encodes.
    pub upi_id: String,

    /// Public URL of the QR image shown during registration.
    pub qr_image_url: String,

    /// Soft cap on assignments per day.
    pub daily_limit: i32,

    /// Assignments served today. Incremented once per successful
    /// registration; resets are handled externally.
    pub today_usage: i32,

    /// Only active codes are eligible for assignment.
    pub active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registrant::Entity")]
    Registrant,
}

impl Related<super::registrant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
