use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::auth::AuthContext;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod companies;
pub mod product_sales;
pub mod products;
pub mod roles;
pub mod users;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Catalog writes (companies and products) are for Admin and Manager.
pub(crate) fn require_catalog_role(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.role.can_manage_catalog() {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("role {} may not modify the catalog", ctx.role)))
    }
}

pub(crate) fn require_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("role {} may not manage users", ctx.role)))
    }
}

/// Build the full application router: public routes, the token-guarded API and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", put(auth::change_password));

    let catalog = Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route("/companies/:id", get(companies::get).put(companies::update).delete(companies::delete))
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get).put(products::update).delete(products::delete))
        .route("/product-sales", get(product_sales::list).post(product_sales::create))
        .route(
            "/product-sales/:id",
            get(product_sales::get).put(product_sales::update).delete(product_sales::delete),
        );

    let accounts = Router::new()
        .route("/roles", get(roles::list))
        .route("/users", get(users::list).post(users::create))
        .route("/users/me", put(users::update_me))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(catalog)
        .merge(accounts)
        .with_state(state.clone())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // token check covers everything outside the public list
        .layer(middleware::from_fn_with_state(state, auth::require_bearer_token_state))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
