use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::errors::ApiError;
use crate::handlers::common::{map_service_error, success_response};
use crate::AppState;

/// Creates the router for promotion endpoints
pub fn promotions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promotions))
        .route("/:id", get(get_promotion))
        .route("/migrate-sales", post(migrate_sales))
}

/// List promotions
#[utoipa::path(
    get,
    path = "/api/v1/promotions",
    responses(
        (status = 200, description = "Promotions", body = [crate::services::promotions::PromotionView]),
        (status = 500, description = "Internal error", body = crate::errors::ErrorResponse)
    ),
    tag = "Promotions"
)]
pub async fn list_promotions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let promotions = state
        .promotions
        .list_promotions()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(promotions))
}

/// Get one promotion
#[utoipa::path(
    get,
    path = "/api/v1/promotions/{id}",
    params(("id" = i32, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "Promotion", body = crate::services::promotions::PromotionView),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Promotions"
)]
pub async fn get_promotion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match state
        .promotions
        .get_promotion(id)
        .await
        .map_err(map_service_error)?
    {
        Some(promotion) => Ok(success_response(promotion)),
        None => Err(ApiError::NotFound(format!(
            "Promotion with ID {id} not found"
        ))),
    }
}

/// Run the sale-to-promotion migration
#[utoipa::path(
    post,
    path = "/api/v1/promotions/migrate-sales",
    responses(
        (status = 200, description = "Migration summary", body = crate::services::sale_migration::MigrationSummary),
        (status = 500, description = "Internal error", body = crate::errors::ErrorResponse)
    ),
    tag = "Promotions"
)]
pub async fn migrate_sales(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state.migrator.run().await.map_err(map_service_error)?;
    Ok(success_response(summary))
}
