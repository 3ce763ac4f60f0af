use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Unique indexes and the (entity, field) pair each one guards.
const UNIQUE_INDEXES: &[(&str, &str, &str)] = &[
    ("uq_company_name", "company", "name"),
    ("uq_company_address", "company", "address"),
    ("uq_company_phone", "company", "phone"),
    ("uq_product_name", "product", "name"),
    ("uq_product_registration_number", "product", "registration_number"),
    ("uq_app_user_username", "user", "username"),
    ("uq_app_user_email", "user", "email"),
];

impl ServiceError {
    /// Stable numeric code surfaced to API clients.
    pub fn code(&self) -> u32 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthorized(_) => 1004,
            ServiceError::Forbidden(_) => 1005,
            ServiceError::Unexpected(_) => 1200,
        }
    }

    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{entity} {id} not found"))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::Conflict(format!("{entity} with the same {field} already exists"))
    }

    pub fn has_dependents(entity: &str, dependents: &str) -> Self {
        Self::Conflict(format!("{entity} still has {dependents}; remove them first"))
    }

    /// The single failure returned for every bad-credential case.
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("invalid credentials".into())
    }

    pub fn invalid_token() -> Self {
        Self::Unauthorized("invalid or expired token".into())
    }

    /// Classify a storage error. Constraint violations become conflicts so a
    /// lost race against a concurrent writer reads the same as a failed
    /// pre-check.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => unique_violation(&detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::Conflict(format!("referenced record missing or still in use: {detail}"))
            }
            _ => Self::Unexpected(err.to_string()),
        }
    }
}

fn unique_violation(detail: &str) -> ServiceError {
    UNIQUE_INDEXES
        .iter()
        .find(|(index, _, _)| detail.contains(index))
        .map(|(_, entity, field)| ServiceError::duplicate(entity, field))
        .unwrap_or_else(|| ServiceError::Conflict(format!("duplicate value: {detail}")))
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Db(msg) => ServiceError::Unexpected(msg),
        }
    }
}
