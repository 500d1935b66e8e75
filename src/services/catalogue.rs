//! Catalogue scope aggregation for sales.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{sale_category, sale_collection, sale_product, sale_variant};
use crate::errors::ServiceError;
use crate::global_id;
use crate::predicate::{CatalogueKind, CataloguePredicate};

/// The catalogue entities a sale applies to, kept both as local keys and
/// as the encoded global IDs plugins and the predicate consume. Ordered
/// sets keep predicate output and downstream ID lists deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogueInfo {
    pub collection_ids: BTreeSet<i32>,
    pub category_ids: BTreeSet<i32>,
    pub product_ids: BTreeSet<i32>,
    pub variant_ids: BTreeSet<i32>,
    pub collection_global_ids: BTreeSet<String>,
    pub category_global_ids: BTreeSet<String>,
    pub product_global_ids: BTreeSet<String>,
    pub variant_global_ids: BTreeSet<String>,
}

impl CatalogueInfo {
    /// Record one entity in both the local and the global-ID set.
    pub fn insert(&mut self, kind: CatalogueKind, id: i32) {
        let encoded = global_id::encode(kind.type_name(), id);
        match kind {
            CatalogueKind::Collection => {
                self.collection_ids.insert(id);
                self.collection_global_ids.insert(encoded);
            }
            CatalogueKind::Category => {
                self.category_ids.insert(id);
                self.category_global_ids.insert(encoded);
            }
            CatalogueKind::Product => {
                self.product_ids.insert(id);
                self.product_global_ids.insert(encoded);
            }
            CatalogueKind::Variant => {
                self.variant_ids.insert(id);
                self.variant_global_ids.insert(encoded);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collection_ids.is_empty()
            && self.category_ids.is_empty()
            && self.product_ids.is_empty()
            && self.variant_ids.is_empty()
    }

    pub fn extend(&mut self, other: &CatalogueInfo) {
        self.collection_ids.extend(&other.collection_ids);
        self.category_ids.extend(&other.category_ids);
        self.product_ids.extend(&other.product_ids);
        self.variant_ids.extend(&other.variant_ids);
        self.collection_global_ids
            .extend(other.collection_global_ids.iter().cloned());
        self.category_global_ids
            .extend(other.category_global_ids.iter().cloned());
        self.product_global_ids
            .extend(other.product_global_ids.iter().cloned());
        self.variant_global_ids
            .extend(other.variant_global_ids.iter().cloned());
    }

    /// Encode this scope as the persisted predicate shape.
    pub fn to_predicate(&self) -> CataloguePredicate {
        CataloguePredicate::from_global_ids(
            self.collection_global_ids.iter().cloned().collect(),
            self.category_global_ids.iter().cloned().collect(),
            self.product_global_ids.iter().cloned().collect(),
            self.variant_global_ids.iter().cloned().collect(),
        )
    }
}

/// Load the catalogue scope of each given sale, plus the union across all
/// of them (used to batch the price recalculation job).
pub async fn fetch_catalogue_infos<C: ConnectionTrait>(
    db: &C,
    sale_ids: &[i32],
) -> Result<(HashMap<i32, CatalogueInfo>, CatalogueInfo), ServiceError> {
    let mut per_sale: HashMap<i32, CatalogueInfo> = HashMap::new();
    let mut union = CatalogueInfo::default();
    if sale_ids.is_empty() {
        return Ok((per_sale, union));
    }

    for row in sale_collection::Entity::find()
        .filter(sale_collection::Column::SaleId.is_in(sale_ids.iter().copied()))
        .all(db)
        .await?
    {
        per_sale
            .entry(row.sale_id)
            .or_default()
            .insert(CatalogueKind::Collection, row.collection_id);
        union.insert(CatalogueKind::Collection, row.collection_id);
    }

    for row in sale_category::Entity::find()
        .filter(sale_category::Column::SaleId.is_in(sale_ids.iter().copied()))
        .all(db)
        .await?
    {
        per_sale
            .entry(row.sale_id)
            .or_default()
            .insert(CatalogueKind::Category, row.category_id);
        union.insert(CatalogueKind::Category, row.category_id);
    }

    for row in sale_product::Entity::find()
        .filter(sale_product::Column::SaleId.is_in(sale_ids.iter().copied()))
        .all(db)
        .await?
    {
        per_sale
            .entry(row.sale_id)
            .or_default()
            .insert(CatalogueKind::Product, row.product_id);
        union.insert(CatalogueKind::Product, row.product_id);
    }

    for row in sale_variant::Entity::find()
        .filter(sale_variant::Column::SaleId.is_in(sale_ids.iter().copied()))
        .all(db)
        .await?
    {
        per_sale
            .entry(row.sale_id)
            .or_default()
            .insert(CatalogueKind::Variant, row.product_variant_id);
        union.insert(CatalogueKind::Variant, row.product_variant_id);
    }

    Ok((per_sale, union))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_from_scope_keeps_only_populated_kinds() {
        let mut info = CatalogueInfo::default();
        info.insert(CatalogueKind::Product, 1);
        info.insert(CatalogueKind::Product, 2);

        let predicate = info.to_predicate();
        assert_eq!(predicate.or.len(), 1);
        assert_eq!(predicate.decoded_ids(CatalogueKind::Product), vec![1, 2]);
    }

    #[test]
    fn insert_records_local_and_global_forms() {
        let mut info = CatalogueInfo::default();
        info.insert(CatalogueKind::Variant, 9);

        assert!(info.variant_ids.contains(&9));
        assert!(info
            .variant_global_ids
            .contains(&global_id::encode("ProductVariant", 9)));
    }

    #[test]
    fn empty_scope_gives_empty_predicate() {
        assert!(CatalogueInfo::default().to_predicate().is_empty());
    }

    #[test]
    fn union_extend_deduplicates() {
        let mut a = CatalogueInfo::default();
        a.insert(CatalogueKind::Category, 1);
        let mut b = CatalogueInfo::default();
        b.insert(CatalogueKind::Category, 1);
        b.insert(CatalogueKind::Variant, 9);

        a.extend(&b);
        assert_eq!(a.category_ids.len(), 1);
        assert_eq!(a.category_global_ids.len(), 1);
        assert_eq!(a.variant_ids.len(), 1);
    }
}
