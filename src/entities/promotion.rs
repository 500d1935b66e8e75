use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Lineage back-reference to the migrated sale; unique across promotions.
    #[sea_orm(unique)]
    pub old_sale_id: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::promotion_rule::Entity")]
    PromotionRule,
    #[sea_orm(has_many = "super::promotion_translation::Entity")]
    PromotionTranslation,
}

impl Related<super::promotion_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromotionRule.def()
    }
}

impl Related<super::promotion_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromotionTranslation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
