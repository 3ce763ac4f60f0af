//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access: each entity has a repository
//!   trait with a SeaORM implementation and an in-memory mock.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod uniqueness;
pub mod storage;
pub mod role;
pub mod company;
pub mod product;
pub mod product_sale;
pub mod user;
pub mod auth;
pub mod registry;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::{PageRequest, Paged};
pub use registry::{Repositories, Services};
