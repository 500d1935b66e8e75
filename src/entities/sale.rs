use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a discount value is applied: a fixed amount in the channel
/// currency, or a percentage of the base price.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum DiscountValueType {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub sale_type: DiscountValueType,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set by the toggle task once the start/end notification went out.
    pub notification_sent_datetime: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_channel_listing::Entity")]
    SaleChannelListing,
    #[sea_orm(has_many = "super::sale_translation::Entity")]
    SaleTranslation,
}

impl Related<super::sale_channel_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleChannelListing.def()
    }
}

impl Related<super::sale_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleTranslation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
