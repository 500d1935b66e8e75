use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::predicate::CataloguePredicate;

use super::sale::DiscountValueType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotion_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub promotion_id: i32,
    pub name: String,
    /// Persisted JSON predicate selecting the catalogue entities this rule
    /// applies to. Written by the migrator and read back by the sale
    /// resolvers, so the shape has to stay stable.
    #[sea_orm(column_type = "Json")]
    pub catalogue_predicate: CataloguePredicate,
    pub reward_value_type: Option<DiscountValueType>,
    pub reward_value: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::promotion::Entity",
        from = "Column::PromotionId",
        to = "super::promotion::Column::Id"
    )]
    Promotion,
    #[sea_orm(has_many = "super::promotion_rule_channel::Entity")]
    PromotionRuleChannel,
}

impl Related<super::promotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Promotion.def()
    }
}

impl Related<super::promotion_rule_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromotionRuleChannel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
