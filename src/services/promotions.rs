//! Read access to the new promotion model.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{
    channel, promotion, promotion_rule, promotion_rule_channel, sale::DiscountValueType,
};
use crate::errors::ServiceError;
use crate::predicate::CataloguePredicate;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionRuleView {
    pub id: i32,
    pub name: String,
    #[schema(value_type = Object)]
    pub catalogue_predicate: CataloguePredicate,
    pub reward_value_type: Option<DiscountValueType>,
    pub reward_value: Option<Decimal>,
    pub channel_slugs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionView {
    pub id: i32,
    pub name: String,
    pub old_sale_id: Option<i32>,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub rules: Vec<PromotionRuleView>,
}

#[derive(Clone)]
pub struct PromotionReadService {
    db: DatabaseConnection,
}

impl PromotionReadService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_promotion(&self, id: i32) -> Result<Option<PromotionView>, ServiceError> {
        let promotion = promotion::Entity::find_by_id(id).one(&self.db).await?;
        match promotion {
            Some(promotion) => Ok(Some(self.build_view(promotion).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_promotions(&self) -> Result<Vec<PromotionView>, ServiceError> {
        let promotions = promotion::Entity::find()
            .order_by_asc(promotion::Column::Id)
            .all(&self.db)
            .await?;
        let mut views = Vec::with_capacity(promotions.len());
        for promotion in promotions {
            views.push(self.build_view(promotion).await?);
        }
        Ok(views)
    }

    async fn build_view(&self, promotion: promotion::Model) -> Result<PromotionView, ServiceError> {
        let rules = promotion_rule::Entity::find()
            .filter(promotion_rule::Column::PromotionId.eq(promotion.id))
            .order_by_asc(promotion_rule::Column::Id)
            .all(&self.db)
            .await?;

        let mut rule_views = Vec::with_capacity(rules.len());
        for rule in rules {
            let channel_ids: Vec<i32> = promotion_rule_channel::Entity::find()
                .filter(promotion_rule_channel::Column::RuleId.eq(rule.id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.channel_id)
                .collect();
            let channel_slugs = channel::Entity::find()
                .filter(channel::Column::Id.is_in(channel_ids))
                .order_by_asc(channel::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| c.slug)
                .collect();
            rule_views.push(PromotionRuleView {
                id: rule.id,
                name: rule.name,
                catalogue_predicate: rule.catalogue_predicate,
                reward_value_type: rule.reward_value_type,
                reward_value: rule.reward_value,
                channel_slugs,
            });
        }

        Ok(PromotionView {
            id: promotion.id,
            name: promotion.name,
            old_sale_id: promotion.old_sale_id,
            start_date: promotion.start_date,
            end_date: promotion.end_date,
            created_at: promotion.created_at,
            updated_at: promotion.updated_at,
            rules: rule_views,
        })
    }
}
