use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::handlers::common::{map_service_error, success_response};
use crate::AppState;

/// Creates the router for the legacy sale endpoints
pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/:id", get(get_sale))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SaleListParams {
    /// Channel slug to restrict the listing to
    pub channel: Option<String>,
    /// Name search term
    pub query: Option<String>,
}

/// List migrated sales
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SaleListParams),
    responses(
        (status = 200, description = "Sales", body = [crate::services::sales::SaleView]),
        (status = 500, description = "Internal error", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let sales = state
        .sales
        .list_sales(params.channel.as_deref(), params.query.as_deref())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(sales))
}

/// Get one sale by its legacy id
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = i32, Path, description = "Legacy sale ID")),
    responses(
        (status = 200, description = "Sale", body = crate::services::sales::SaleView),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match state.sales.get_sale(id).await.map_err(map_service_error)? {
        Some(sale) => Ok(success_response(sale)),
        None => Err(ApiError::NotFound(format!("Sale with ID {id} not found"))),
    }
}
