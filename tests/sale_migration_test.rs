mod common;

use std::collections::HashSet;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};

use discounts_api::entities::sale::DiscountValueType;
use discounts_api::entities::{
    checkout_line_discount, order_line_discount, promotion, promotion_rule,
    promotion_rule_channel, promotion_translation,
};
use discounts_api::global_id;
use discounts_api::predicate::CatalogueKind;
use discounts_api::services::sale_migration::{
    ListingBatches, SalePkBatches, SaleToPromotionMigrator,
};

use common::*;

#[tokio::test]
async fn listed_sale_becomes_promotion_with_one_rule_per_listing() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;
    let outlet = create_channel(&db, "outlet", "EUR").await;

    let sale = create_sale(
        &db,
        "Summer Sale",
        DiscountValueType::Percentage,
        days_ago(3),
        None,
    )
    .await;
    create_listing(&db, sale.id, webshop.id, Decimal::new(10, 0)).await;
    create_listing(&db, sale.id, outlet.id, Decimal::new(15, 0)).await;

    let shirt = create_product(&db, "Shirt").await;
    let mug = create_product(&db, "Mug").await;
    attach_product(&db, sale.id, shirt.id).await;
    attach_product(&db, sale.id, mug.id).await;

    let summary = SaleToPromotionMigrator::new(db.clone())
        .run()
        .await
        .expect("migration run");
    assert_eq!(summary.promotions_created, 1);
    assert_eq!(summary.rules_created, 2);
    assert_eq!(summary.sales_skipped, 0);

    let promo = promotion::Entity::find()
        .filter(promotion::Column::OldSaleId.eq(sale.id))
        .one(&db)
        .await
        .expect("query promotion")
        .expect("promotion exists");
    assert_eq!(promo.name, "Summer Sale");
    assert_eq!(promo.start_date, sale.start_date);
    assert_eq!(promo.end_date, None);

    let rules = promotion_rule::Entity::find()
        .filter(promotion_rule::Column::PromotionId.eq(promo.id))
        .all(&db)
        .await
        .expect("query rules");
    assert_eq!(rules.len(), 2);

    let mut seen_values = HashSet::new();
    for rule in &rules {
        assert_eq!(rule.reward_value_type, Some(DiscountValueType::Percentage));
        assert_eq!(
            rule.catalogue_predicate.decoded_ids(CatalogueKind::Product),
            vec![shirt.id, mug.id]
        );
        seen_values.insert(rule.reward_value.expect("listed rule has value"));
    }
    assert_eq!(
        seen_values,
        HashSet::from([Decimal::new(10, 0), Decimal::new(15, 0)])
    );

    // Each rule is bound to exactly the channel of the listing it came
    // from, with that listing's discount value.
    let channel_rows = promotion_rule_channel::Entity::find()
        .all(&db)
        .await
        .expect("query rule channels");
    assert_eq!(channel_rows.len(), 2);
    let channels: HashSet<i32> = channel_rows.iter().map(|r| r.channel_id).collect();
    assert_eq!(channels, HashSet::from([webshop.id, outlet.id]));

    let expected_value_by_channel = std::collections::HashMap::from([
        (webshop.id, Decimal::new(10, 0)),
        (outlet.id, Decimal::new(15, 0)),
    ]);
    for link in &channel_rows {
        let rule = rules
            .iter()
            .find(|r| r.id == link.rule_id)
            .expect("linked rule exists");
        assert_eq!(
            rule.reward_value,
            Some(expected_value_by_channel[&link.channel_id])
        );
    }
}

#[tokio::test]
async fn unlisted_sale_gets_single_rule_without_value_or_channel() {
    let db = setup_db().await;
    let sale = create_sale(
        &db,
        "Ghost Sale",
        DiscountValueType::Fixed,
        days_ago(1),
        None,
    )
    .await;
    let cat = create_category(&db, "Shoes").await;
    attach_category(&db, sale.id, cat.id).await;

    let summary = SaleToPromotionMigrator::new(db.clone())
        .run()
        .await
        .expect("migration run");
    assert_eq!(summary.promotions_created, 1);
    assert_eq!(summary.rules_created, 1);

    let rule = promotion_rule::Entity::find()
        .one(&db)
        .await
        .expect("query rule")
        .expect("rule exists");
    assert_eq!(rule.reward_value, None);
    assert_eq!(rule.reward_value_type, Some(DiscountValueType::Fixed));
    assert_eq!(
        rule.catalogue_predicate.decoded_ids(CatalogueKind::Category),
        vec![cat.id]
    );

    let channel_rows = promotion_rule_channel::Entity::find()
        .all(&db)
        .await
        .expect("query rule channels");
    assert!(channel_rows.is_empty());
}

#[tokio::test]
async fn translations_are_copied_to_the_promotion() {
    let db = setup_db().await;
    let sale = create_sale(
        &db,
        "Soldes",
        DiscountValueType::Fixed,
        days_ago(2),
        None,
    )
    .await;
    create_sale_translation(&db, sale.id, "fr", "Soldes d'hiver").await;
    create_sale_translation(&db, sale.id, "de", "Winterschlussverkauf").await;

    let summary = SaleToPromotionMigrator::new(db.clone())
        .run()
        .await
        .expect("migration run");
    assert_eq!(summary.translations_copied, 2);

    let promo = promotion::Entity::find()
        .filter(promotion::Column::OldSaleId.eq(sale.id))
        .one(&db)
        .await
        .expect("query promotion")
        .expect("promotion exists");
    let translations = promotion_translation::Entity::find()
        .filter(promotion_translation::Column::PromotionId.eq(promo.id))
        .all(&db)
        .await
        .expect("query translations");
    let langs: HashSet<&str> = translations.iter().map(|t| t.language_code.as_str()).collect();
    assert_eq!(langs, HashSet::from(["fr", "de"]));
}

#[tokio::test]
async fn line_discounts_are_repointed_or_counted_as_unmatched() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;

    let sale = create_sale(
        &db,
        "Flash Sale",
        DiscountValueType::Fixed,
        days_ago(1),
        None,
    )
    .await;
    create_listing(&db, sale.id, webshop.id, Decimal::new(5, 0)).await;

    let matched_order = create_order_line_discount(&db, sale.id, webshop.id, Decimal::new(5, 0)).await;
    // Discount recorded against a channel the sale was never listed in.
    let orphan_order = create_order_line_discount(&db, sale.id, 9999, Decimal::new(5, 0)).await;
    let matched_checkout =
        create_checkout_line_discount(&db, sale.id, webshop.id, Decimal::new(5, 0)).await;

    let summary = SaleToPromotionMigrator::new(db.clone())
        .run()
        .await
        .expect("migration run");
    assert_eq!(summary.order_discounts_repointed, 1);
    assert_eq!(summary.unmatched_order_discounts, 1);
    assert_eq!(summary.checkout_discounts_repointed, 1);
    assert_eq!(summary.unmatched_checkout_discounts, 0);

    let rule = promotion_rule::Entity::find()
        .one(&db)
        .await
        .expect("query rule")
        .expect("rule exists");

    let matched = order_line_discount::Entity::find_by_id(matched_order.id)
        .one(&db)
        .await
        .expect("query matched discount")
        .expect("row exists");
    assert_eq!(matched.promotion_rule_id, Some(rule.id));

    let orphan = order_line_discount::Entity::find_by_id(orphan_order.id)
        .one(&db)
        .await
        .expect("query orphan discount")
        .expect("row exists");
    assert_eq!(orphan.promotion_rule_id, None);
    assert_eq!(orphan.sale_id, Some(sale.id));

    let checkout = checkout_line_discount::Entity::find_by_id(matched_checkout.id)
        .one(&db)
        .await
        .expect("query checkout discount")
        .expect("row exists");
    assert_eq!(checkout.promotion_rule_id, Some(rule.id));
}

#[tokio::test]
async fn second_run_skips_already_migrated_sales() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;

    let listed = create_sale(
        &db,
        "Listed",
        DiscountValueType::Percentage,
        days_ago(1),
        None,
    )
    .await;
    create_listing(&db, listed.id, webshop.id, Decimal::new(20, 0)).await;
    create_sale(&db, "Unlisted", DiscountValueType::Fixed, days_ago(1), None).await;

    let migrator = SaleToPromotionMigrator::new(db.clone());
    let first = migrator.run().await.expect("first run");
    assert_eq!(first.promotions_created, 2);
    assert_eq!(first.sales_skipped, 0);

    let second = migrator.run().await.expect("second run");
    assert_eq!(second.promotions_created, 0);
    assert_eq!(second.rules_created, 0);
    assert_eq!(second.sales_skipped, 2);

    assert_eq!(
        promotion::Entity::find().all(&db).await.expect("query").len(),
        2
    );
    assert_eq!(
        promotion_rule::Entity::find().all(&db).await.expect("query").len(),
        2
    );
}

#[tokio::test]
async fn predicate_ids_are_global_ids() {
    let db = setup_db().await;
    let sale = create_sale(
        &db,
        "Variant Sale",
        DiscountValueType::Fixed,
        days_ago(1),
        None,
    )
    .await;
    let product = create_product(&db, "Lamp").await;
    let variant = create_variant(&db, product.id, "Lamp / black").await;
    attach_variant(&db, sale.id, variant.id).await;

    SaleToPromotionMigrator::new(db.clone())
        .run()
        .await
        .expect("migration run");

    let rule = promotion_rule::Entity::find()
        .one(&db)
        .await
        .expect("query rule")
        .expect("rule exists");
    let json = serde_json::to_value(&rule.catalogue_predicate).expect("serialize predicate");
    assert_eq!(
        json,
        serde_json::json!({
            "OR": [
                { "variantPredicate": { "ids": [global_id::encode("ProductVariant", variant.id)] } }
            ]
        })
    );
}

#[tokio::test]
async fn sale_pk_batches_cover_every_sale_exactly_once() {
    let db = setup_db().await;
    let mut expected = HashSet::new();
    for i in 0..5 {
        let sale = create_sale(
            &db,
            &format!("Sale {i}"),
            DiscountValueType::Fixed,
            days_ago(1),
            None,
        )
        .await;
        expected.insert(sale.id);
    }

    let mut batches = SalePkBatches::all();
    let mut seen = Vec::new();
    let mut batch_count = 0;
    while let Some(pks) = batches.next_batch(&db, 2).await.expect("next batch") {
        batch_count += 1;
        seen.extend(pks);
    }
    assert_eq!(batch_count, 3);
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.iter().copied().collect::<HashSet<_>>(), expected);

    let mut empty = SalePkBatches::new(
        Condition::all().add(discounts_api::entities::sale::Column::Id.gt(i32::MAX - 1)),
    );
    assert!(empty.next_batch(&db, 2).await.expect("next batch").is_none());
}

#[tokio::test]
async fn listing_batches_never_split_one_sales_listings() {
    let db = setup_db().await;
    let c1 = create_channel(&db, "c1", "USD").await;
    let c2 = create_channel(&db, "c2", "USD").await;
    let c3 = create_channel(&db, "c3", "USD").await;

    let wide = create_sale(&db, "Wide", DiscountValueType::Fixed, days_ago(1), None).await;
    create_listing(&db, wide.id, c1.id, Decimal::new(1, 0)).await;
    create_listing(&db, wide.id, c2.id, Decimal::new(2, 0)).await;
    create_listing(&db, wide.id, c3.id, Decimal::new(3, 0)).await;
    let narrow = create_sale(&db, "Narrow", DiscountValueType::Fixed, days_ago(1), None).await;
    create_listing(&db, narrow.id, c1.id, Decimal::new(4, 0)).await;

    // Window of two still pulls all three of the first sale's listings.
    let mut batches = ListingBatches::new();
    let first = batches
        .next_batch(&db, 2)
        .await
        .expect("next batch")
        .expect("first batch");
    assert_eq!(first.len(), 3);
    let second = batches
        .next_batch(&db, 2)
        .await
        .expect("next batch")
        .expect("second batch");
    assert_eq!(second.len(), 1);
    assert!(batches.next_batch(&db, 2).await.expect("next batch").is_none());

    // A small batch size produces the same promotions as one big batch.
    let summary = SaleToPromotionMigrator::with_batch_size(db.clone(), 2)
        .run()
        .await
        .expect("migration run");
    assert_eq!(summary.promotions_created, 2);
    assert_eq!(summary.rules_created, 4);
    let rules = promotion_rule::Entity::find()
        .filter(promotion_rule::Column::RewardValue.is_not_null())
        .all(&db)
        .await
        .expect("query rules");
    assert_eq!(rules.len(), 4);
}
