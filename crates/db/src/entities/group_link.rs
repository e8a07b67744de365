//! Community group link entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coarse college classification used to pick a group link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum CollegeGroup {
    #[sea_orm(string_value = "RGM")]
    Rgm,
    #[sea_orm(string_value = "OTHERS")]
    Others,
}

/// WhatsApp invitation link for a college classification.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub college: CollegeGroup,

    pub whatsapp_link: String,

    pub active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
