use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount applied to an order line. Carries the channel the order was
/// placed in; the migrator re-points `promotion_rule_id` using the
/// (channel, sale) pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_line_discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sale_id: Option<i32>,
    pub promotion_rule_id: Option<i32>,
    pub channel_id: i32,
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::promotion_rule::Entity",
        from = "Column::PromotionRuleId",
        to = "super::promotion_rule::Column::Id"
    )]
    PromotionRule,
}

impl ActiveModelBehavior for ActiveModel {}
