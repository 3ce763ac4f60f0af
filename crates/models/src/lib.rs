//! SeaORM entities backing the inventory service plus the small field
//! validators shared by the service layer.

pub mod errors;
pub mod db;
pub mod role;
pub mod company;
pub mod product;
pub mod product_sale;
pub mod user;
pub mod user_credentials;

#[cfg(test)]
mod tests;
