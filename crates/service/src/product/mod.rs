//! Products: unique name, immutable generated registration number, owned by
//! an existing company; removal is blocked while sales reference them.

pub mod domain;
pub mod registration;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use domain::{NewProductRecord, Product, ProductFilter, ProductInput};
pub use registration::{RandomRegistrationNumbers, RegistrationNumberSource};
pub use repository::ProductRepository;
pub use service::ProductService;
