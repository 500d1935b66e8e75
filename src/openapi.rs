use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Discounts API",
        version = "0.1.0",
        description = "Sale-to-promotion migration and the legacy sale/voucher read surface."
    ),
    paths(
        crate::handlers::sales::list_sales,
        crate::handlers::sales::get_sale,
        crate::handlers::vouchers::list_vouchers,
        crate::handlers::vouchers::get_voucher,
        crate::handlers::promotions::list_promotions,
        crate::handlers::promotions::get_promotion,
        crate::handlers::promotions::migrate_sales,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::services::sales::SaleView,
        crate::services::sales::SaleChannelListingView,
        crate::services::sales::CatalogueEntityView,
        crate::services::vouchers::VoucherView,
        crate::services::vouchers::VoucherChannelListingView,
        crate::services::promotions::PromotionView,
        crate::services::promotions::PromotionRuleView,
        crate::services::sale_migration::MigrationSummary,
        crate::entities::sale::DiscountValueType,
    )),
    tags(
        (name = "Sales", description = "Legacy sale read surface, backed by migrated promotions"),
        (name = "Vouchers", description = "Voucher read surface"),
        (name = "Promotions", description = "Promotion model and the sale migration")
    )
)]
pub struct ApiDoc;
