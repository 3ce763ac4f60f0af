//! Companies: unique name, address and phone; removal is blocked while the
//! company still owns products.

pub mod domain;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use domain::{Company, CompanyFilter, CompanyInput};
pub use repository::CompanyRepository;
pub use service::CompanyService;
