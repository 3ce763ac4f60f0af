use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use service::product_sale::{NewProductSale, ProductSale, ProductSaleFilter, ProductSaleInput};
use service::{PageRequest, Paged};

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSaleListQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub product_id: Option<i32>,
    /// Case-insensitive substring of the sold product's name.
    pub product_name: Option<String>,
    /// Inclusive lower bound, RFC 3339.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound, RFC 3339.
    pub to: Option<DateTime<Utc>>,
}

#[utoipa::path(get, path = "/product-sales", tag = "product-sales", security(("bearer" = [])), params(ProductSaleListQuery),
    responses((status = 200, description = "One page of sales", body = crate::openapi::ProductSalePageDoc)))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ProductSaleListQuery>,
) -> Result<Json<Paged<ProductSale>>, ApiError> {
    let page = PageRequest::from_query(q.page_index, q.page_size);
    let filter = ProductSaleFilter { product_id: q.product_id, product_name: q.product_name, from: q.from, to: q.to };
    Ok(Json(state.services.sales.get_all_paged(&filter, page).await?))
}

#[utoipa::path(get, path = "/product-sales/{id}", tag = "product-sales", security(("bearer" = [])), params(("id" = i32, Path, description = "Product sale id")),
    responses((status = 200, description = "OK", body = crate::openapi::ProductSaleDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<ProductSale>, ApiError> {
    Ok(Json(state.services.sales.get_by_id(id).await?))
}

/// Price and date default to the product's current price and now.
#[utoipa::path(post, path = "/product-sales", tag = "product-sales", security(("bearer" = [])), request_body = crate::openapi::NewProductSaleDoc,
    responses((status = 201, description = "Created", body = crate::openapi::ProductSaleDoc), (status = 404, description = "Unknown product", body = crate::errors::ErrorBody)))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewProductSale>,
) -> Result<(StatusCode, Json<ProductSale>), ApiError> {
    let created = state.services.sales.add(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/product-sales/{id}", tag = "product-sales", security(("bearer" = [])), params(("id" = i32, Path, description = "Product sale id")), request_body = crate::openapi::ProductSaleInputDoc,
    responses((status = 200, description = "OK", body = crate::openapi::ProductSaleDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<ProductSaleInput>,
) -> Result<Json<ProductSale>, ApiError> {
    Ok(Json(state.services.sales.update(id, input).await?))
}

#[utoipa::path(delete, path = "/product-sales/{id}", tag = "product-sales", security(("bearer" = [])), params(("id" = i32, Path, description = "Product sale id")),
    responses((status = 204, description = "No Content"), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    state.services.sales.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
