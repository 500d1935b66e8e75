mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tower::ServiceExt;

use discounts_api::config::AppConfig;
use discounts_api::entities::promotion_rule;
use discounts_api::entities::sale::DiscountValueType;
use discounts_api::events::EventSender;
use discounts_api::global_id;
use discounts_api::plugins::PluginManager;
use discounts_api::{app_router, AppState};
use sea_orm::{DatabaseConnection, EntityTrait};

use common::*;

fn build_app(db: DatabaseConnection) -> Router {
    let config = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        0,
        "test".to_string(),
    );
    let (tx, _rx) = mpsc::channel(16);
    let state = AppState::new(db, config, EventSender::new(tx), PluginManager::new());
    app_router(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse json body");
    (status, json)
}

async fn post_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse json body");
    (status, json)
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = build_app(setup_db().await);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_sale_returns_404_error_body() {
    let app = build_app(setup_db().await);
    let (status, body) = get_json(&app, "/api/v1/sales/123").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"]
        .as_str()
        .expect("message field")
        .contains("123"));
}

#[tokio::test]
async fn migrated_sale_is_served_in_the_legacy_shape() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;
    let sale = create_sale(
        &db,
        "Summer Sale",
        DiscountValueType::Percentage,
        days_ago(2),
        None,
    )
    .await;
    create_listing(&db, sale.id, webshop.id, Decimal::new(25, 0)).await;
    let shirt = create_product(&db, "Shirt").await;
    attach_product(&db, sale.id, shirt.id).await;

    let app = build_app(db.clone());
    let (status, summary) = post_json(&app, "/api/v1/promotions/migrate-sales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["promotions_created"], 1);
    assert_eq!(summary["rules_created"], 1);

    let rule = promotion_rule::Entity::find()
        .one(&db)
        .await
        .expect("query rule")
        .expect("rule exists");

    let (status, body) = get_json(&app, &format!("/api/v1/sales/{}", sale.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], global_id::encode("Sale", sale.id));
    assert_eq!(body["name"], "Summer Sale");
    assert_eq!(body["type"], "percentage");
    assert_eq!(body["discount_value"], "25");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["channel_listings"][0]["channel_slug"], "webshop");
    // The synthesized listing id decodes back to the backing rule.
    assert_eq!(
        body["channel_listings"][0]["id"],
        global_id::encode("PromotionRule", rule.id)
    );
    assert_eq!(
        body["products"][0]["id"],
        global_id::encode("Product", shirt.id)
    );
    assert_eq!(body["products"][0]["name"], "Shirt");
}

#[tokio::test]
async fn sale_listing_filters_by_channel_slug() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;
    let outlet = create_channel(&db, "outlet", "EUR").await;

    let listed_everywhere = create_sale(
        &db,
        "Everywhere",
        DiscountValueType::Fixed,
        days_ago(1),
        None,
    )
    .await;
    create_listing(&db, listed_everywhere.id, webshop.id, Decimal::new(5, 0)).await;
    create_listing(&db, listed_everywhere.id, outlet.id, Decimal::new(5, 0)).await;
    let outlet_only = create_sale(
        &db,
        "Outlet only",
        DiscountValueType::Fixed,
        days_ago(1),
        None,
    )
    .await;
    create_listing(&db, outlet_only.id, outlet.id, Decimal::new(7, 0)).await;

    let app = build_app(db);
    post_json(&app, "/api/v1/promotions/migrate-sales").await;

    let (status, body) = get_json(&app, "/api/v1/sales?channel=webshop").await;
    assert_eq!(status, StatusCode::OK);
    let sales = body.as_array().expect("array body");
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["name"], "Everywhere");

    let (_, all) = get_json(&app, "/api/v1/sales").await;
    assert_eq!(all.as_array().expect("array body").len(), 2);

    let (_, none) = get_json(&app, "/api/v1/sales?channel=nope").await;
    assert!(none.as_array().expect("array body").is_empty());
}

#[tokio::test]
async fn promotion_listing_exposes_rules_and_channels() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;
    let sale = create_sale(&db, "Promo", DiscountValueType::Fixed, days_ago(1), None).await;
    create_listing(&db, sale.id, webshop.id, Decimal::new(3, 0)).await;

    let app = build_app(db);
    post_json(&app, "/api/v1/promotions/migrate-sales").await;

    let (status, body) = get_json(&app, "/api/v1/promotions").await;
    assert_eq!(status, StatusCode::OK);
    let promotions = body.as_array().expect("array body");
    assert_eq!(promotions.len(), 1);
    assert_eq!(promotions[0]["old_sale_id"], sale.id);
    assert_eq!(promotions[0]["rules"][0]["channel_slugs"][0], "webshop");
    assert_eq!(promotions[0]["rules"][0]["catalogue_predicate"]["OR"], serde_json::json!([]));
}

#[tokio::test]
async fn voucher_endpoints_filter_and_resolve() {
    let db = setup_db().await;
    let webshop = create_channel(&db, "webshop", "USD").await;
    let ten_off = create_voucher(&db, Some("Ten off"), "TENOFF", DiscountValueType::Fixed).await;
    create_voucher_listing(&db, ten_off.id, webshop.id, Decimal::new(10, 0)).await;
    create_voucher(&db, Some("Unlisted"), "NOWHERE", DiscountValueType::Percentage).await;

    let app = build_app(db);

    let (status, body) = get_json(&app, &format!("/api/v1/vouchers/{}", ten_off.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], global_id::encode("Voucher", ten_off.id));
    assert_eq!(body["code"], "TENOFF");
    assert_eq!(body["channel_listings"][0]["currency"], "USD");

    let (_, filtered) = get_json(&app, "/api/v1/vouchers?channel=webshop").await;
    let vouchers = filtered.as_array().expect("array body");
    assert_eq!(vouchers.len(), 1);
    assert_eq!(vouchers[0]["name"], "Ten off");

    let (_, searched) = get_json(&app, "/api/v1/vouchers?query=NOWHERE").await;
    assert_eq!(searched.as_array().expect("array body").len(), 1);

    let (status, _) = get_json(&app, "/api/v1/vouchers/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
