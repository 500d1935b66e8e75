//! One-off data migration converting legacy sales into promotions.
//!
//! Works in keyset-paginated batches so the full tables never sit in
//! memory. Each batch creates promotions and rules, copies translations,
//! and re-points line discounts at the new rules. Sales that already have a
//! promotion carrying their `old_sale_id` are skipped, so a re-run is a
//! no-op for them.

use std::collections::{BTreeSet, HashMap, HashSet};

use sea_orm::{
    sea_query::Query, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::entities::{
    checkout_line_discount, order_line_discount, promotion, promotion_rule,
    promotion_rule_channel, promotion_translation, sale, sale_channel_listing, sale_translation,
};
use crate::errors::ServiceError;
use crate::services::catalogue::{self, CatalogueInfo};

/// Default batch size for both iterators.
pub const MIGRATION_BATCH_SIZE: u64 = 100;

/// Counters reported by a migration run.
#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct MigrationSummary {
    pub promotions_created: u64,
    pub rules_created: u64,
    pub translations_copied: u64,
    pub order_discounts_repointed: u64,
    pub checkout_discounts_repointed: u64,
    /// Line discounts whose (channel, sale) pair had no matching rule.
    /// They keep their old sale reference.
    pub unmatched_order_discounts: u64,
    pub unmatched_checkout_discounts: u64,
    /// Sales skipped because a promotion with their `old_sale_id` already
    /// existed.
    pub sales_skipped: u64,
}

/// Pages `sale_channel_listings` ordered by owning sale id. Each window is
/// extended to cover every listing sharing the window's last sale id, so a
/// sale's listings are never split across two batches.
#[derive(Debug, Default)]
pub struct ListingBatches {
    last_sale_id: i32,
}

impl ListingBatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn next_batch(
        &mut self,
        db: &DatabaseConnection,
        batch_size: u64,
    ) -> Result<Option<Vec<i32>>, ServiceError> {
        let window = sale_channel_listing::Entity::find()
            .filter(sale_channel_listing::Column::SaleId.gt(self.last_sale_id))
            .order_by_asc(sale_channel_listing::Column::SaleId)
            .limit(batch_size)
            .all(db)
            .await?;
        let last_sale_id = match window.last() {
            Some(listing) => listing.sale_id,
            None => return Ok(None),
        };

        let extended = sale_channel_listing::Entity::find()
            .filter(sale_channel_listing::Column::SaleId.gt(self.last_sale_id))
            .filter(sale_channel_listing::Column::SaleId.lte(last_sale_id))
            .order_by_asc(sale_channel_listing::Column::SaleId)
            .all(db)
            .await?;
        self.last_sale_id = last_sale_id;
        Ok(Some(extended.into_iter().map(|l| l.id).collect()))
    }
}

/// Pages sale primary keys with `pk > last ORDER BY pk LIMIT n`, optionally
/// restricted by an extra condition.
#[derive(Debug)]
pub struct SalePkBatches {
    last_pk: i32,
    condition: Condition,
}

impl SalePkBatches {
    pub fn new(condition: Condition) -> Self {
        Self {
            last_pk: 0,
            condition,
        }
    }

    pub fn all() -> Self {
        Self::new(Condition::all())
    }

    pub async fn next_batch(
        &mut self,
        db: &DatabaseConnection,
        batch_size: u64,
    ) -> Result<Option<Vec<i32>>, ServiceError> {
        let pks: Vec<i32> = sale::Entity::find()
            .select_only()
            .column(sale::Column::Id)
            .filter(self.condition.clone())
            .filter(sale::Column::Id.gt(self.last_pk))
            .order_by_asc(sale::Column::Id)
            .limit(batch_size)
            .into_tuple()
            .all(db)
            .await?;
        let last = match pks.last() {
            Some(pk) => *pk,
            None => return Ok(None),
        };
        self.last_pk = last;
        Ok(Some(pks))
    }
}

#[derive(Clone)]
pub struct SaleToPromotionMigrator {
    db: DatabaseConnection,
    batch_size: u64,
}

impl SaleToPromotionMigrator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            batch_size: MIGRATION_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(db: DatabaseConnection, batch_size: u64) -> Self {
        Self { db, batch_size }
    }

    /// Run the full migration: first every sale with at least one channel
    /// listing, then the leftovers with none.
    pub async fn run(&self) -> Result<MigrationSummary, ServiceError> {
        let mut summary = MigrationSummary::default();

        let mut listing_batches = ListingBatches::new();
        while let Some(listing_pks) = listing_batches
            .next_batch(&self.db, self.batch_size)
            .await?
        {
            self.migrate_listed_batch(&listing_pks, &mut summary).await?;
        }

        let unlisted = Condition::all().add(
            sale::Column::Id.not_in_subquery(
                Query::select()
                    .column(sale_channel_listing::Column::SaleId)
                    .from(sale_channel_listing::Entity)
                    .to_owned(),
            ),
        );
        let mut sale_batches = SalePkBatches::new(unlisted);
        while let Some(sale_pks) = sale_batches.next_batch(&self.db, self.batch_size).await? {
            self.migrate_unlisted_batch(&sale_pks, &mut summary).await?;
        }

        info!(
            promotions = summary.promotions_created,
            rules = summary.rules_created,
            skipped = summary.sales_skipped,
            unmatched_order = summary.unmatched_order_discounts,
            unmatched_checkout = summary.unmatched_checkout_discounts,
            "sale to promotion migration finished"
        );
        Ok(summary)
    }

    /// Migrate one batch of channel listings together with their sales.
    async fn migrate_listed_batch(
        &self,
        listing_pks: &[i32],
        summary: &mut MigrationSummary,
    ) -> Result<(), ServiceError> {
        let listings = sale_channel_listing::Entity::find()
            .filter(sale_channel_listing::Column::Id.is_in(listing_pks.iter().copied()))
            .order_by_asc(sale_channel_listing::Column::SaleId)
            .all(&self.db)
            .await?;
        let batch_sale_ids: BTreeSet<i32> = listings.iter().map(|l| l.sale_id).collect();

        let sale_ids = self
            .filter_unmigrated(batch_sale_ids.iter().copied().collect(), summary)
            .await?;
        if sale_ids.is_empty() {
            return Ok(());
        }

        let promotion_by_sale = self.create_promotions(&sale_ids, summary).await?;
        let sales = sale::Entity::find()
            .filter(sale::Column::Id.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;
        let sale_by_id: HashMap<i32, sale::Model> =
            sales.into_iter().map(|s| (s.id, s)).collect();
        let (catalogues, _) = catalogue::fetch_catalogue_infos(&self.db, &sale_ids).await?;

        // One rule per listing, bulk-inserted. The fresh promotions own no
        // other rules, so re-reading them ordered by id yields the rules in
        // insertion order and lines them back up with their listings.
        let mut rule_models = Vec::new();
        let mut pending_channels: Vec<(i32, i32)> = Vec::new();
        for listing in &listings {
            let Some(sale) = sale_by_id.get(&listing.sale_id) else {
                // Sale already migrated in an earlier run.
                continue;
            };
            let promotion_id = self.promotion_id_for(&promotion_by_sale, sale.id)?;
            let predicate = catalogues
                .get(&sale.id)
                .cloned()
                .unwrap_or_default()
                .to_predicate();
            rule_models.push(promotion_rule::ActiveModel {
                promotion_id: Set(promotion_id),
                name: Set(String::new()),
                catalogue_predicate: Set(predicate),
                reward_value_type: Set(Some(sale.sale_type.clone())),
                reward_value: Set(Some(listing.discount_value)),
                ..Default::default()
            });
            pending_channels.push((listing.channel_id, listing.sale_id));
        }

        let mut rule_by_channel_sale: HashMap<String, i32> = HashMap::new();
        if !rule_models.is_empty() {
            summary.rules_created += rule_models.len() as u64;
            promotion_rule::Entity::insert_many(rule_models)
                .exec(&self.db)
                .await?;

            let created = promotion_rule::Entity::find()
                .filter(
                    promotion_rule::Column::PromotionId
                        .is_in(promotion_by_sale.values().copied()),
                )
                .order_by_asc(promotion_rule::Column::Id)
                .all(&self.db)
                .await?;
            let mut channel_rows = Vec::with_capacity(created.len());
            for (rule, (channel_id, sale_id)) in created.iter().zip(&pending_channels) {
                channel_rows.push(promotion_rule_channel::ActiveModel {
                    rule_id: Set(rule.id),
                    channel_id: Set(*channel_id),
                });
                rule_by_channel_sale.insert(format!("{channel_id}_{sale_id}"), rule.id);
            }
            promotion_rule_channel::Entity::insert_many(channel_rows)
                .exec(&self.db)
                .await?;
        }

        self.copy_translations(&sale_ids, &promotion_by_sale, summary)
            .await?;
        self.repoint_order_line_discounts(&sale_ids, &rule_by_channel_sale, summary)
            .await?;
        self.repoint_checkout_line_discounts(&sale_ids, &rule_by_channel_sale, summary)
            .await?;

        debug!(
            sales = sale_ids.len(),
            listings = listings.len(),
            "migrated listed sale batch"
        );
        Ok(())
    }

    /// Migrate one batch of sales that are not listed in any channel: one
    /// promotion plus one rule with no reward value and no channel.
    async fn migrate_unlisted_batch(
        &self,
        sale_pks: &[i32],
        summary: &mut MigrationSummary,
    ) -> Result<(), ServiceError> {
        let sale_ids = self.filter_unmigrated(sale_pks.to_vec(), summary).await?;
        if sale_ids.is_empty() {
            return Ok(());
        }

        let promotion_by_sale = self.create_promotions(&sale_ids, summary).await?;
        let sales = sale::Entity::find()
            .filter(sale::Column::Id.is_in(sale_ids.iter().copied()))
            .order_by_asc(sale::Column::Id)
            .all(&self.db)
            .await?;
        let (catalogues, _) = catalogue::fetch_catalogue_infos(&self.db, &sale_ids).await?;

        let mut rules = Vec::with_capacity(sales.len());
        for sale in &sales {
            let promotion_id = self.promotion_id_for(&promotion_by_sale, sale.id)?;
            let predicate = catalogues
                .get(&sale.id)
                .cloned()
                .unwrap_or_default()
                .to_predicate();
            rules.push(promotion_rule::ActiveModel {
                promotion_id: Set(promotion_id),
                name: Set(String::new()),
                catalogue_predicate: Set(predicate),
                reward_value_type: Set(Some(sale.sale_type.clone())),
                reward_value: Set(None),
                ..Default::default()
            });
        }
        if !rules.is_empty() {
            summary.rules_created += rules.len() as u64;
            promotion_rule::Entity::insert_many(rules).exec(&self.db).await?;
        }

        self.copy_translations(&sale_ids, &promotion_by_sale, summary)
            .await?;

        debug!(sales = sale_ids.len(), "migrated unlisted sale batch");
        Ok(())
    }

    /// Drop sale ids that already have a promotion, counting the skips.
    async fn filter_unmigrated(
        &self,
        sale_ids: Vec<i32>,
        summary: &mut MigrationSummary,
    ) -> Result<Vec<i32>, ServiceError> {
        if sale_ids.is_empty() {
            return Ok(sale_ids);
        }
        let migrated: HashSet<i32> = promotion::Entity::find()
            .filter(promotion::Column::OldSaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|p| p.old_sale_id)
            .collect();
        summary.sales_skipped += migrated.len() as u64;
        Ok(sale_ids
            .into_iter()
            .filter(|id| !migrated.contains(id))
            .collect())
    }

    /// Bulk-create one promotion per sale, then re-read them to learn the
    /// generated ids (`old_sale_id` is unique, so the mapping is exact).
    async fn create_promotions(
        &self,
        sale_ids: &[i32],
        summary: &mut MigrationSummary,
    ) -> Result<HashMap<i32, i32>, ServiceError> {
        let sales = sale::Entity::find()
            .filter(sale::Column::Id.is_in(sale_ids.iter().copied()))
            .order_by_asc(sale::Column::Id)
            .all(&self.db)
            .await?;
        if sales.is_empty() {
            return Ok(HashMap::new());
        }

        let promotions: Vec<promotion::ActiveModel> = sales
            .iter()
            .map(|sale| promotion::ActiveModel {
                name: Set(sale.name.clone()),
                old_sale_id: Set(Some(sale.id)),
                start_date: Set(sale.start_date),
                end_date: Set(sale.end_date),
                created_at: Set(sale.created_at),
                updated_at: Set(sale.updated_at),
                ..Default::default()
            })
            .collect();
        summary.promotions_created += promotions.len() as u64;
        promotion::Entity::insert_many(promotions)
            .exec(&self.db)
            .await?;

        let created = promotion::Entity::find()
            .filter(promotion::Column::OldSaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(created
            .into_iter()
            .filter_map(|p| p.old_sale_id.map(|sale_id| (sale_id, p.id)))
            .collect())
    }

    fn promotion_id_for(
        &self,
        promotion_by_sale: &HashMap<i32, i32>,
        sale_id: i32,
    ) -> Result<i32, ServiceError> {
        promotion_by_sale.get(&sale_id).copied().ok_or_else(|| {
            ServiceError::InternalError(format!("no promotion created for sale {sale_id}"))
        })
    }

    async fn copy_translations(
        &self,
        sale_ids: &[i32],
        promotion_by_sale: &HashMap<i32, i32>,
        summary: &mut MigrationSummary,
    ) -> Result<(), ServiceError> {
        let translations = sale_translation::Entity::find()
            .filter(sale_translation::Column::SaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;
        let rows: Vec<promotion_translation::ActiveModel> = translations
            .iter()
            .filter_map(|t| {
                promotion_by_sale
                    .get(&t.sale_id)
                    .map(|promotion_id| promotion_translation::ActiveModel {
                        promotion_id: Set(*promotion_id),
                        language_code: Set(t.language_code.clone()),
                        name: Set(t.name.clone()),
                        ..Default::default()
                    })
            })
            .collect();
        if !rows.is_empty() {
            summary.translations_copied += rows.len() as u64;
            promotion_translation::Entity::insert_many(rows)
                .exec(&self.db)
                .await?;
        }
        Ok(())
    }

    async fn repoint_order_line_discounts(
        &self,
        sale_ids: &[i32],
        rule_by_channel_sale: &HashMap<String, i32>,
        summary: &mut MigrationSummary,
    ) -> Result<(), ServiceError> {
        let rows = order_line_discount::Entity::find()
            .filter(order_line_discount::Column::SaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;
        for row in rows {
            let Some(sale_id) = row.sale_id else { continue };
            let key = format!("{}_{}", row.channel_id, sale_id);
            match rule_by_channel_sale.get(&key) {
                Some(rule_id) => {
                    let mut model: order_line_discount::ActiveModel = row.into();
                    model.promotion_rule_id = Set(Some(*rule_id));
                    model.update(&self.db).await?;
                    summary.order_discounts_repointed += 1;
                }
                None => summary.unmatched_order_discounts += 1,
            }
        }
        Ok(())
    }

    async fn repoint_checkout_line_discounts(
        &self,
        sale_ids: &[i32],
        rule_by_channel_sale: &HashMap<String, i32>,
        summary: &mut MigrationSummary,
    ) -> Result<(), ServiceError> {
        let rows = checkout_line_discount::Entity::find()
            .filter(checkout_line_discount::Column::SaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;
        for row in rows {
            let Some(sale_id) = row.sale_id else { continue };
            let key = format!("{}_{}", row.channel_id, sale_id);
            match rule_by_channel_sale.get(&key) {
                Some(rule_id) => {
                    let mut model: checkout_line_discount::ActiveModel = row.into();
                    model.promotion_rule_id = Set(Some(*rule_id));
                    model.update(&self.db).await?;
                    summary.checkout_discounts_repointed += 1;
                }
                None => summary.unmatched_checkout_discounts += 1,
            }
        }
        Ok(())
    }
}
