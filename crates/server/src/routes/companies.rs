use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use service::auth::AuthContext;
use service::company::{Company, CompanyFilter, CompanyInput};
use service::{PageRequest, Paged};

use super::auth::ServerState;
use super::require_catalog_role;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyListQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
}

#[utoipa::path(get, path = "/companies", tag = "companies", security(("bearer" = [])), params(CompanyListQuery),
    responses((status = 200, description = "One page of companies", body = crate::openapi::CompanyPageDoc)))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<CompanyListQuery>,
) -> Result<Json<Paged<Company>>, ApiError> {
    let page = PageRequest::from_query(q.page_index, q.page_size);
    let filter = CompanyFilter { name: q.name };
    Ok(Json(state.services.companies.get_all_paged(&filter, page).await?))
}

#[utoipa::path(get, path = "/companies/{id}", tag = "companies", security(("bearer" = [])), params(("id" = i32, Path, description = "Company id")),
    responses((status = 200, description = "OK", body = crate::openapi::CompanyDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Company>, ApiError> {
    Ok(Json(state.services.companies.get_by_id(id).await?))
}

#[utoipa::path(post, path = "/companies", tag = "companies", security(("bearer" = [])), request_body = crate::openapi::CompanyInputDoc,
    responses((status = 201, description = "Created", body = crate::openapi::CompanyDoc), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CompanyInput>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    require_catalog_role(&ctx)?;
    let created = state.services.companies.add(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/companies/{id}", tag = "companies", security(("bearer" = [])), params(("id" = i32, Path, description = "Company id")), request_body = crate::openapi::CompanyInputDoc,
    responses((status = 200, description = "OK", body = crate::openapi::CompanyDoc), (status = 404, description = "Not Found", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(input): Json<CompanyInput>,
) -> Result<Json<Company>, ApiError> {
    require_catalog_role(&ctx)?;
    Ok(Json(state.services.companies.update(id, input).await?))
}

#[utoipa::path(delete, path = "/companies/{id}", tag = "companies", security(("bearer" = [])), params(("id" = i32, Path, description = "Company id")),
    responses((status = 204, description = "No Content"), (status = 404, description = "Not Found", body = crate::errors::ErrorBody), (status = 409, description = "Company still has products", body = crate::errors::ErrorBody)))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_catalog_role(&ctx)?;
    state.services.companies.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
