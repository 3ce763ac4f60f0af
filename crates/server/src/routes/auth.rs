use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use service::auth::{AuthContext, AuthSession, ChangePasswordInput, LoginInput};
use service::user::User;
use service::Services;

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub services: Services,
    /// Mark the session cookie `Secure`; off for plain-http local runs.
    pub secure_cookie: bool,
}

impl ServerState {
    pub fn new(services: Services) -> Self {
        Self { services, secure_cookie: false }
    }
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in", body = crate::openapi::AuthSessionDoc), (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let session = state.services.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.secure_cookie);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", security(("bearer" = [])),
    responses((status = 200, description = "Current user", body = crate::openapi::UserDoc), (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)))]
pub async fn me(State(state): State<ServerState>, Extension(ctx): Extension<AuthContext>) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.auth.me(&ctx).await?))
}

#[utoipa::path(put, path = "/auth/password", tag = "auth", security(("bearer" = [])), request_body = crate::openapi::ChangePasswordRequest,
    responses((status = 204, description = "Password changed"), (status = 400, description = "Weak password", body = crate::errors::ErrorBody), (status = 401, description = "Wrong current password", body = crate::errors::ErrorBody)))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<StatusCode, ApiError> {
    state.services.auth.change_password(&ctx, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS
        || path == "/health"
        || path == "/auth/login"
        || path == "/auth/logout"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Pull the token from `Authorization: Bearer`, falling back to the session cookie.
fn extract_token(req: &Request) -> Result<String, ApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let raw = value.to_str().map_err(|_| ApiError::unauthorized("malformed Authorization header"))?;
        return match raw.strip_prefix("Bearer ").map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(ApiError::unauthorized("Authorization header must use the Bearer scheme")),
        };
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))
}

/// Global middleware: every route outside the public list needs a valid token.
/// The resolved [`AuthContext`] is placed in the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    if is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let token = extract_token(&req).map_err(|e| {
        tracing::warn!(path = %path, detail = %e.body.detail, "request without usable credentials");
        e
    })?;
    let ctx = state.services.auth.authenticate(&token).map_err(|e| {
        tracing::warn!(path = %path, "token validation failed");
        ApiError::from(e)
    })?;
    tracing::debug!(path = %path, user_id = ctx.user_id, role = %ctx.role, "request authenticated");
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
