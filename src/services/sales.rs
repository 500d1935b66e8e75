//! Read-side adapter presenting migrated promotions as legacy sales.
//!
//! Every field is resolved from the promotion and its rules on demand; no
//! caching. A promotion without rules yields nulls for type, discount
//! value, currency and channel listings rather than an error.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{
    category, channel, collection, product, product_variant, promotion, promotion_rule,
    promotion_rule_channel, sale::DiscountValueType,
};
use crate::errors::ServiceError;
use crate::global_id;
use crate::predicate::CatalogueKind;

/// A catalogue entity referenced by a sale, with its global ID.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogueEntityView {
    pub id: String,
    pub name: String,
}

/// Channel listing synthesized from a rule and its channel.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleChannelListingView {
    pub id: String,
    pub channel_slug: String,
    pub discount_value: Option<Decimal>,
    pub currency: String,
}

/// The legacy sale shape, reconstructed from a migrated promotion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sale_type: Option<DiscountValueType>,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub discount_value: Option<Decimal>,
    pub currency: Option<String>,
    pub channel_listings: Vec<SaleChannelListingView>,
    pub categories: Vec<CatalogueEntityView>,
    pub collections: Vec<CatalogueEntityView>,
    pub products: Vec<CatalogueEntityView>,
    pub variants: Vec<CatalogueEntityView>,
}

#[derive(Clone)]
pub struct SaleReadService {
    db: DatabaseConnection,
}

impl SaleReadService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve one sale by its legacy id.
    pub async fn get_sale(&self, old_sale_id: i32) -> Result<Option<SaleView>, ServiceError> {
        let promotion = promotion::Entity::find()
            .filter(promotion::Column::OldSaleId.eq(old_sale_id))
            .one(&self.db)
            .await?;
        match promotion {
            Some(promotion) => Ok(Some(self.build_view(promotion).await?)),
            None => Ok(None),
        }
    }

    /// List migrated sales, optionally restricted to a channel and a name
    /// search term.
    pub async fn list_sales(
        &self,
        channel_slug: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<SaleView>, ServiceError> {
        let mut select = promotion::Entity::find()
            .filter(promotion::Column::OldSaleId.is_not_null())
            .order_by_asc(promotion::Column::OldSaleId);

        if let Some(slug) = channel_slug {
            let Some(channel) = channel::Entity::find()
                .filter(channel::Column::Slug.eq(slug))
                .one(&self.db)
                .await?
            else {
                return Ok(Vec::new());
            };
            let rule_ids: Vec<i32> = promotion_rule_channel::Entity::find()
                .filter(promotion_rule_channel::Column::ChannelId.eq(channel.id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.rule_id)
                .collect();
            let promotion_ids: Vec<i32> = promotion_rule::Entity::find()
                .filter(promotion_rule::Column::Id.is_in(rule_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|rule| rule.promotion_id)
                .collect();
            select = select.filter(promotion::Column::Id.is_in(promotion_ids));
        }
        if let Some(query) = query {
            select = select.filter(promotion::Column::Name.contains(query));
        }

        let promotions = select.all(&self.db).await?;
        let mut views = Vec::with_capacity(promotions.len());
        for promotion in promotions {
            views.push(self.build_view(promotion).await?);
        }
        Ok(views)
    }

    async fn build_view(&self, promotion: promotion::Model) -> Result<SaleView, ServiceError> {
        let old_sale_id = promotion.old_sale_id.ok_or_else(|| {
            ServiceError::InternalError(format!(
                "promotion {} has no legacy sale lineage",
                promotion.id
            ))
        })?;

        // Rules discarded data when a promotion has several: resolve from
        // the rule with the smallest id so the choice is deterministic.
        let rule = promotion_rule::Entity::find()
            .filter(promotion_rule::Column::PromotionId.eq(promotion.id))
            .order_by_asc(promotion_rule::Column::Id)
            .one(&self.db)
            .await?;
        let channel = match &rule {
            Some(rule) => {
                let link = promotion_rule_channel::Entity::find()
                    .filter(promotion_rule_channel::Column::RuleId.eq(rule.id))
                    .order_by_asc(promotion_rule_channel::Column::ChannelId)
                    .one(&self.db)
                    .await?;
                match link {
                    Some(link) => {
                        channel::Entity::find_by_id(link.channel_id)
                            .one(&self.db)
                            .await?
                    }
                    None => None,
                }
            }
            None => None,
        };

        let (categories, collections, products, variants) = match &rule {
            Some(rule) => self.resolve_catalogue(rule).await?,
            None => Default::default(),
        };

        // The listing is synthesized from the rule, so its id encodes the
        // rule's own type and key and stays reversible to a real row.
        let channel_listings = match (&rule, &channel) {
            (Some(rule), Some(channel)) => vec![SaleChannelListingView {
                id: global_id::encode("PromotionRule", rule.id),
                channel_slug: channel.slug.clone(),
                discount_value: rule.reward_value,
                currency: channel.currency_code.clone(),
            }],
            _ => Vec::new(),
        };

        Ok(SaleView {
            id: global_id::encode("Sale", old_sale_id),
            name: promotion.name,
            sale_type: rule.as_ref().and_then(|r| r.reward_value_type.clone()),
            start_date: promotion.start_date,
            end_date: promotion.end_date,
            created: promotion.created_at,
            updated_at: promotion.updated_at,
            discount_value: rule.as_ref().and_then(|r| r.reward_value),
            currency: channel.as_ref().map(|c| c.currency_code.clone()),
            channel_listings,
            categories,
            collections,
            products,
            variants,
        })
    }

    /// Reverse-decode the rule's predicate and load the referenced rows.
    async fn resolve_catalogue(
        &self,
        rule: &promotion_rule::Model,
    ) -> Result<
        (
            Vec<CatalogueEntityView>,
            Vec<CatalogueEntityView>,
            Vec<CatalogueEntityView>,
            Vec<CatalogueEntityView>,
        ),
        ServiceError,
    > {
        let predicate = &rule.catalogue_predicate;

        let categories = category::Entity::find()
            .filter(category::Column::Id.is_in(predicate.decoded_ids(CatalogueKind::Category)))
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| CatalogueEntityView {
                id: global_id::encode(CatalogueKind::Category.type_name(), c.id),
                name: c.name,
            })
            .collect();

        let collections = collection::Entity::find()
            .filter(collection::Column::Id.is_in(predicate.decoded_ids(CatalogueKind::Collection)))
            .order_by_asc(collection::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| CatalogueEntityView {
                id: global_id::encode(CatalogueKind::Collection.type_name(), c.id),
                name: c.name,
            })
            .collect();

        let products = product::Entity::find()
            .filter(product::Column::Id.is_in(predicate.decoded_ids(CatalogueKind::Product)))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| CatalogueEntityView {
                id: global_id::encode(CatalogueKind::Product.type_name(), p.id),
                name: p.name,
            })
            .collect();

        let variants = product_variant::Entity::find()
            .filter(
                product_variant::Column::Id.is_in(predicate.decoded_ids(CatalogueKind::Variant)),
            )
            .order_by_asc(product_variant::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|v| CatalogueEntityView {
                id: global_id::encode(CatalogueKind::Variant.type_name(), v.id),
                name: v.name,
            })
            .collect();

        Ok((categories, collections, products, variants))
    }
}
