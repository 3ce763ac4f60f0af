use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use service::auth::AuthContext;
use service::product::{Product, ProductFilter, ProductInput};
use service::{PageRequest, Paged};

use super::auth::ServerState;
use super::require_catalog_role;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub name: Option<String>,
    pub company_id: Option<i32>,
}

#[utoipa::path(get, path = "/products", tag = "products", security(("bearer" = [])), params(ProductListQuery),
    responses((status = 200, description = "One page of products", body = crate::openapi::ProductPageDoc)))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ProductListQuery>,
) -> Result<Json<Paged<Product>>, ApiError> {
    let page = PageRequest::from_query(q.page_index, q.page_size);
    let filter = ProductFilter { name: q.name, company_id: q.company_id };
    Ok(Json(state.services.products.get_all_paged(&filter, page).await?))
}

#[utoipa::path(get, path = "/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")),
    responses((status = 200, description = "OK", body = crate::openapi::ProductDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.services.products.get_by_id(id).await?))
}

#[utoipa::path(post, path = "/products", tag = "products", security(("bearer" = [])), request_body = crate::openapi::ProductInputDoc,
    responses((status = 201, description = "Created", body = crate::openapi::ProductDoc), (status = 404, description = "Unknown company", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    require_catalog_role(&ctx)?;
    let created = state.services.products.add(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), request_body = crate::openapi::ProductInputDoc,
    responses((status = 200, description = "OK", body = crate::openapi::ProductDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    require_catalog_role(&ctx)?;
    Ok(Json(state.services.products.update(id, input).await?))
}

#[utoipa::path(delete, path = "/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")),
    responses((status = 204, description = "No Content"), (status = 404, description = "Not Found", body = crate::errors::ErrorBody), (status = 409, description = "Product still has sales", body = crate::errors::ErrorBody)))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_catalog_role(&ctx)?;
    state.services.products.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
