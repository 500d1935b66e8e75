//! Discounts API Library
//!
//! Converts the legacy sale discount model into promotions, notifies
//! plugins when sales start or end, and serves the old "Sale" read surface
//! from the migrated rows.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod global_id;
pub mod handlers;
pub mod openapi;
pub mod plugins;
pub mod predicate;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::promotions::PromotionReadService;
use services::sale_migration::SaleToPromotionMigrator;
use services::sales::SaleReadService;
use services::vouchers::VoucherReadService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub plugins: plugins::PluginManager,
    pub sales: SaleReadService,
    pub vouchers: VoucherReadService,
    pub promotions: PromotionReadService,
    pub migrator: SaleToPromotionMigrator,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: config::AppConfig,
        event_sender: events::EventSender,
        plugins: plugins::PluginManager,
    ) -> Self {
        Self {
            db: Arc::new(db.clone()),
            config,
            event_sender,
            plugins,
            sales: SaleReadService::new(db.clone()),
            vouchers: VoucherReadService::new(db.clone()),
            promotions: PromotionReadService::new(db.clone()),
            migrator: SaleToPromotionMigrator::new(db),
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the full application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/sales", handlers::sales::sales_routes())
        .nest("/api/v1/vouchers", handlers::vouchers::vouchers_routes())
        .nest(
            "/api/v1/promotions",
            handlers::promotions::promotions_routes(),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
