//! Product sales: each references an existing product; unit price and date
//! default from the product and the clock.

pub mod domain;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use domain::{NewProductSale, ProductSale, ProductSaleFilter, ProductSaleInput};
pub use repository::ProductSaleRepository;
pub use service::ProductSaleService;
