use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use service::auth::AuthContext;
use service::user::{AdminUserUpdate, NewUser, ProfileUpdate, User, UserFilter};
use service::{PageRequest, Paged};

use super::auth::ServerState;
use super::require_admin;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub role_id: Option<i32>,
    /// Matches "first last", case-insensitive.
    pub full_name: Option<String>,
    pub username: Option<String>,
}

#[utoipa::path(get, path = "/users", tag = "users", security(("bearer" = [])), params(UserListQuery),
    responses((status = 200, description = "OK", body = crate::openapi::UserPageDoc), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody)))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<UserListQuery>,
) -> Result<Json<Paged<User>>, ApiError> {
    require_admin(&ctx)?;
    let page = PageRequest::from_query(q.page_index, q.page_size);
    let filter = UserFilter { role_id: q.role_id, full_name: q.full_name, username: q.username };
    Ok(Json(state.services.users.get_all_paged(&filter, page).await?))
}

/// Admins may read anyone; everybody else only themselves.
#[utoipa::path(get, path = "/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    if !ctx.is_admin() && ctx.user_id != id {
        return Err(ApiError::forbidden("users may only read their own account"));
    }
    Ok(Json(state.services.users.get_by_id(id).await?))
}

#[utoipa::path(post, path = "/users", tag = "users", security(("bearer" = [])), request_body = crate::openapi::NewUserDoc,
    responses((status = 201, description = "Created", body = crate::openapi::UserDoc), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require_admin(&ctx)?;
    let created = state.services.users.add(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/users/me", tag = "users", security(("bearer" = [])), request_body = crate::openapi::ProfileUpdateDoc,
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<ProfileUpdate>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.update_profile(ctx.user_id, input).await?))
}

#[utoipa::path(put, path = "/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::AdminUserUpdateDoc,
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody), (status = 404, description = "Not Found", body = crate::errors::ErrorBody), (status = 409, description = "Conflict", body = crate::errors::ErrorBody)))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(input): Json<AdminUserUpdate>,
) -> Result<Json<User>, ApiError> {
    require_admin(&ctx)?;
    Ok(Json(state.services.users.update(id, input).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")),
    responses((status = 204, description = "No Content"), (status = 403, description = "Forbidden", body = crate::errors::ErrorBody), (status = 404, description = "Not Found", body = crate::errors::ErrorBody)))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_admin(&ctx)?;
    state.services.users.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
