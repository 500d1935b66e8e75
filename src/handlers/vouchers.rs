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

/// Creates the router for voucher endpoints
pub fn vouchers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vouchers))
        .route("/:id", get(get_voucher))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VoucherListParams {
    /// Channel slug to restrict the listing to
    pub channel: Option<String>,
    /// Name or code search term
    pub query: Option<String>,
}

/// List vouchers
#[utoipa::path(
    get,
    path = "/api/v1/vouchers",
    params(VoucherListParams),
    responses(
        (status = 200, description = "Vouchers", body = [crate::services::vouchers::VoucherView]),
        (status = 500, description = "Internal error", body = crate::errors::ErrorResponse)
    ),
    tag = "Vouchers"
)]
pub async fn list_vouchers(
    State(state): State<AppState>,
    Query(params): Query<VoucherListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let vouchers = state
        .vouchers
        .list_vouchers(params.channel.as_deref(), params.query.as_deref())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vouchers))
}

/// Get one voucher
#[utoipa::path(
    get,
    path = "/api/v1/vouchers/{id}",
    params(("id" = i32, Path, description = "Voucher ID")),
    responses(
        (status = 200, description = "Voucher", body = crate::services::vouchers::VoucherView),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vouchers"
)]
pub async fn get_voucher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match state
        .vouchers
        .get_voucher(id)
        .await
        .map_err(map_service_error)?
    {
        Some(voucher) => Ok(success_response(voucher)),
        None => Err(ApiError::NotFound(format!(
            "Voucher with ID {id} not found"
        ))),
    }
}
