use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub currency_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_channel_listing::Entity")]
    SaleChannelListing,
}

impl Related<super::sale_channel_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleChannelListing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
