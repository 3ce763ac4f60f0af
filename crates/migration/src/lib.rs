//! Migrator registering entity-specific migrations in dependency order.
//! Indexes (including the unique constraints backing the service-level
//! uniqueness checks) are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_role;
mod m20220101_000002_create_company;
mod m20220101_000003_create_product;
mod m20220101_000004_create_product_sale;
mod m20220101_000005_create_user;
mod m20220101_000006_create_user_credentials;
mod m20220101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_role::Migration),
            Box::new(m20220101_000002_create_company::Migration),
            Box::new(m20220101_000003_create_product::Migration),
            Box::new(m20220101_000004_create_product_sale::Migration),
            Box::new(m20220101_000005_create_user::Migration),
            Box::new(m20220101_000006_create_user_credentials::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000010_add_indexes::Migration),
        ]
    }
}
