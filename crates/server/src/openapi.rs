use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::errors::ErrorBody;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub current_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct AuthSessionDoc { pub user: UserDoc, pub token: String, pub expires_at: DateTime<Utc> }

#[derive(ToSchema)]
pub struct RoleDoc { pub id: i32, pub name: String }

#[derive(ToSchema)]
pub struct CompanyDoc { pub id: i32, pub name: String, pub address: String, pub phone: String }

#[derive(ToSchema)]
pub struct CompanyInputDoc { pub name: String, pub address: String, pub phone: String }

#[derive(ToSchema)]
pub struct ProductDoc { pub id: i32, pub registration_number: i32, pub name: String, pub company_id: i32, pub price: Decimal }

#[derive(ToSchema)]
pub struct ProductInputDoc { pub name: String, pub company_id: i32, pub price: Decimal }

#[derive(ToSchema)]
pub struct ProductSaleDoc { pub id: i32, pub product_id: i32, pub amount: i32, pub price_per_unit: Decimal, pub date: DateTime<Utc> }

/// Omitted price or date defaults to the product's price and the current time.
#[derive(ToSchema)]
pub struct NewProductSaleDoc {
    pub product_id: i32,
    pub amount: i32,
    pub price_per_unit: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct ProductSaleInputDoc { pub product_id: i32, pub amount: i32, pub price_per_unit: Decimal, pub date: DateTime<Utc> }

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `Admin`, `Manager` or `Employee`.
    pub role: String,
}

#[derive(ToSchema)]
pub struct NewUserDoc {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
}

#[derive(ToSchema)]
pub struct ProfileUpdateDoc { pub username: String, pub email: String }

#[derive(ToSchema)]
pub struct AdminUserUpdateDoc { pub username: String, pub email: String, pub role_id: i32 }

#[derive(ToSchema)]
pub struct CompanyPageDoc { pub items: Vec<CompanyDoc>, pub total_count: u64, pub page_index: u64, pub page_size: u64 }

#[derive(ToSchema)]
pub struct ProductPageDoc { pub items: Vec<ProductDoc>, pub total_count: u64, pub page_index: u64, pub page_size: u64 }

#[derive(ToSchema)]
pub struct ProductSalePageDoc { pub items: Vec<ProductSaleDoc>, pub total_count: u64, pub page_index: u64, pub page_size: u64 }

#[derive(ToSchema)]
pub struct UserPageDoc { pub items: Vec<UserDoc>, pub total_count: u64, pub page_index: u64, pub page_size: u64 }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::change_password,
        crate::routes::roles::list,
        crate::routes::companies::list,
        crate::routes::companies::get,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::delete,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::product_sales::list,
        crate::routes::product_sales::get,
        crate::routes::product_sales::create,
        crate::routes::product_sales::update,
        crate::routes::product_sales::delete,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update_me,
        crate::routes::users::update,
        crate::routes::users::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            LoginRequest,
            ChangePasswordRequest,
            AuthSessionDoc,
            RoleDoc,
            CompanyDoc,
            CompanyInputDoc,
            ProductDoc,
            ProductInputDoc,
            ProductSaleDoc,
            NewProductSaleDoc,
            ProductSaleInputDoc,
            UserDoc,
            NewUserDoc,
            ProfileUpdateDoc,
            AdminUserUpdateDoc,
            CompanyPageDoc,
            ProductPageDoc,
            ProductSalePageDoc,
            UserPageDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "roles"),
        (name = "companies"),
        (name = "products"),
        (name = "product-sales"),
        (name = "users")
    )
)]
pub struct ApiDoc;
