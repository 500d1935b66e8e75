//! The catalogue predicate persisted on promotion rules.
//!
//! Serialized shape, written by the migrator and read back by the sale
//! resolvers:
//!
//! ```json
//! {"OR": [{"productPredicate": {"ids": ["<globalID>", ...]}}, ...]}
//! ```
//!
//! Kinds with no associated entities are omitted; a sale with no catalogue
//! associations at all serializes to `{"OR": []}`.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::global_id;

/// The four entity kinds a predicate clause can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogueKind {
    Collection,
    Category,
    Product,
    Variant,
}

impl CatalogueKind {
    /// Type name used inside global IDs for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            CatalogueKind::Collection => "Collection",
            CatalogueKind::Category => "Category",
            CatalogueKind::Product => "Product",
            CatalogueKind::Variant => "ProductVariant",
        }
    }
}

/// One typed ID-list clause of the OR predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CataloguePredicateClause {
    #[serde(rename = "collectionPredicate")]
    Collection(IdFilter),
    #[serde(rename = "categoryPredicate")]
    Category(IdFilter),
    #[serde(rename = "productPredicate")]
    Product(IdFilter),
    #[serde(rename = "variantPredicate")]
    Variant(IdFilter),
}

impl CataloguePredicateClause {
    pub fn kind(&self) -> CatalogueKind {
        match self {
            CataloguePredicateClause::Collection(_) => CatalogueKind::Collection,
            CataloguePredicateClause::Category(_) => CatalogueKind::Category,
            CataloguePredicateClause::Product(_) => CatalogueKind::Product,
            CataloguePredicateClause::Variant(_) => CatalogueKind::Variant,
        }
    }

    pub fn ids(&self) -> &[String] {
        match self {
            CataloguePredicateClause::Collection(f)
            | CataloguePredicateClause::Category(f)
            | CataloguePredicateClause::Product(f)
            | CataloguePredicateClause::Variant(f) => &f.ids,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFilter {
    pub ids: Vec<String>,
}

/// OR-combination of typed clauses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CataloguePredicate {
    #[serde(rename = "OR", default)]
    pub or: Vec<CataloguePredicateClause>,
}

impl CataloguePredicate {
    /// Build a predicate from already-encoded global ID lists. Clause order
    /// is fixed: collections, categories, products, variants.
    pub fn from_global_ids(
        collection_ids: Vec<String>,
        category_ids: Vec<String>,
        product_ids: Vec<String>,
        variant_ids: Vec<String>,
    ) -> Self {
        let mut or = Vec::new();
        if !collection_ids.is_empty() {
            or.push(CataloguePredicateClause::Collection(IdFilter {
                ids: collection_ids,
            }));
        }
        if !category_ids.is_empty() {
            or.push(CataloguePredicateClause::Category(IdFilter { ids: category_ids }));
        }
        if !product_ids.is_empty() {
            or.push(CataloguePredicateClause::Product(IdFilter { ids: product_ids }));
        }
        if !variant_ids.is_empty() {
            or.push(CataloguePredicateClause::Variant(IdFilter { ids: variant_ids }));
        }
        Self { or }
    }

    pub fn is_empty(&self) -> bool {
        self.or.is_empty()
    }

    /// Local keys of the given kind, decoded from the stored global IDs.
    /// Entries that fail to decode are skipped; readers resolve to fewer
    /// rows rather than erroring on bad stored data.
    pub fn decoded_ids(&self, kind: CatalogueKind) -> Vec<i32> {
        self.or
            .iter()
            .filter(|clause| clause.kind() == kind)
            .flat_map(|clause| clause.ids())
            .filter_map(|id| global_id::decode_expecting(kind.type_name(), id).ok())
            .collect()
    }
}
