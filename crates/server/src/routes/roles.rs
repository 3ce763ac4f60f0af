use axum::{extract::State, Json};

use service::role::RoleRecord;

use super::auth::ServerState;
use crate::errors::ApiError;

#[utoipa::path(get, path = "/roles", tag = "roles", security(("bearer" = [])),
    responses((status = 200, description = "OK", body = [crate::openapi::RoleDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<RoleRecord>>, ApiError> {
    Ok(Json(state.services.roles.list().await?))
}
