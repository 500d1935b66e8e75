use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sale::DiscountValueType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vouchers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_name = "type")]
    pub voucher_type: DiscountValueType,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::voucher_channel_listing::Entity")]
    VoucherChannelListing,
}

impl Related<super::voucher_channel_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherChannelListing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
