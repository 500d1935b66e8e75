#![allow(dead_code)]

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use migrations::MigratorTrait;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use discounts_api::entities::{
    category, channel, checkout_line_discount, order_line_discount, product, product_variant,
    sale, sale_category, sale_channel_listing, sale_product, sale_translation, sale_variant,
    voucher, voucher_channel_listing,
};
use discounts_api::entities::sale::DiscountValueType;

/// Fresh in-memory SQLite database with the full schema applied.
///
/// A single pooled connection keeps the in-memory database alive for the
/// whole test.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.expect("connect sqlite");
    migrations::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    db
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::days(days)
}

pub fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + ChronoDuration::days(days)
}

pub async fn create_channel(db: &DatabaseConnection, slug: &str, currency: &str) -> channel::Model {
    channel::ActiveModel {
        slug: Set(slug.to_string()),
        name: Set(slug.to_uppercase()),
        currency_code: Set(currency.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert channel")
}

pub async fn create_sale(
    db: &DatabaseConnection,
    name: &str,
    sale_type: DiscountValueType,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> sale::Model {
    sale::ActiveModel {
        name: Set(name.to_string()),
        sale_type: Set(sale_type),
        start_date: Set(start_date),
        end_date: Set(end_date),
        created_at: Set(start_date),
        updated_at: Set(start_date),
        notification_sent_datetime: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert sale")
}

pub async fn create_listing(
    db: &DatabaseConnection,
    sale_id: i32,
    channel_id: i32,
    discount_value: Decimal,
) -> sale_channel_listing::Model {
    sale_channel_listing::ActiveModel {
        sale_id: Set(sale_id),
        channel_id: Set(channel_id),
        discount_value: Set(discount_value),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert sale channel listing")
}

pub async fn create_product(db: &DatabaseConnection, name: &str) -> product::Model {
    product::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(name.to_lowercase().replace(' ', "-")),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert product")
}

pub async fn create_variant(
    db: &DatabaseConnection,
    product_id: i32,
    name: &str,
) -> product_variant::Model {
    product_variant::ActiveModel {
        product_id: Set(product_id),
        name: Set(name.to_string()),
        sku: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert product variant")
}

pub async fn create_category(db: &DatabaseConnection, name: &str) -> category::Model {
    category::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(name.to_lowercase().replace(' ', "-")),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert category")
}

pub async fn attach_product(db: &DatabaseConnection, sale_id: i32, product_id: i32) {
    sale_product::ActiveModel {
        sale_id: Set(sale_id),
        product_id: Set(product_id),
    }
    .insert(db)
    .await
    .expect("attach product to sale");
}

pub async fn attach_category(db: &DatabaseConnection, sale_id: i32, category_id: i32) {
    sale_category::ActiveModel {
        sale_id: Set(sale_id),
        category_id: Set(category_id),
    }
    .insert(db)
    .await
    .expect("attach category to sale");
}

pub async fn attach_variant(db: &DatabaseConnection, sale_id: i32, variant_id: i32) {
    sale_variant::ActiveModel {
        sale_id: Set(sale_id),
        product_variant_id: Set(variant_id),
    }
    .insert(db)
    .await
    .expect("attach variant to sale");
}

pub async fn create_sale_translation(
    db: &DatabaseConnection,
    sale_id: i32,
    language_code: &str,
    name: &str,
) -> sale_translation::Model {
    sale_translation::ActiveModel {
        sale_id: Set(sale_id),
        language_code: Set(language_code.to_string()),
        name: Set(Some(name.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert sale translation")
}

pub async fn create_order_line_discount(
    db: &DatabaseConnection,
    sale_id: i32,
    channel_id: i32,
    amount: Decimal,
) -> order_line_discount::Model {
    order_line_discount::ActiveModel {
        sale_id: Set(Some(sale_id)),
        promotion_rule_id: Set(None),
        channel_id: Set(channel_id),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert order line discount")
}

pub async fn create_checkout_line_discount(
    db: &DatabaseConnection,
    sale_id: i32,
    channel_id: i32,
    amount: Decimal,
) -> checkout_line_discount::Model {
    checkout_line_discount::ActiveModel {
        sale_id: Set(Some(sale_id)),
        promotion_rule_id: Set(None),
        channel_id: Set(channel_id),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert checkout line discount")
}

pub async fn create_voucher(
    db: &DatabaseConnection,
    name: Option<&str>,
    code: &str,
    voucher_type: DiscountValueType,
) -> voucher::Model {
    voucher::ActiveModel {
        name: Set(name.map(str::to_string)),
        code: Set(code.to_string()),
        voucher_type: Set(voucher_type),
        start_date: Set(days_ago(1)),
        end_date: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert voucher")
}

pub async fn create_voucher_listing(
    db: &DatabaseConnection,
    voucher_id: i32,
    channel_id: i32,
    discount_value: Decimal,
) -> voucher_channel_listing::Model {
    voucher_channel_listing::ActiveModel {
        voucher_id: Set(voucher_id),
        channel_id: Set(channel_id),
        discount_value: Set(discount_value),
        min_spent: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert voucher channel listing")
}
