//! Unique and lookup indexes.
//!
//! The unique index names are matched by the service layer when it turns a
//! storage-level violation into a field-specific conflict message, so keep
//! them in sync with `service::errors`.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Company: name, address and phone are each unique
        manager
            .create_index(Index::create().name("uq_company_name").table(Company::Table).col(Company::Name).unique().to_owned())
            .await?;
        manager
            .create_index(Index::create().name("uq_company_address").table(Company::Table).col(Company::Address).unique().to_owned())
            .await?;
        manager
            .create_index(Index::create().name("uq_company_phone").table(Company::Table).col(Company::Phone).unique().to_owned())
            .await?;

        // Product: unique name and registration number, lookup by company
        manager
            .create_index(Index::create().name("uq_product_name").table(Product::Table).col(Product::Name).unique().to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_product_registration_number")
                    .table(Product::Table)
                    .col(Product::RegistrationNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(Index::create().name("idx_product_company").table(Product::Table).col(Product::CompanyId).to_owned())
            .await?;

        // ProductSale: lookup by product and by date
        manager
            .create_index(Index::create().name("idx_product_sale_product").table(ProductSale::Table).col(ProductSale::ProductId).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_product_sale_date").table(ProductSale::Table).col(ProductSale::Date).to_owned())
            .await?;

        // Users: unique username and email, lookup by role
        manager
            .create_index(Index::create().name("uq_app_user_username").table(AppUser::Table).col(AppUser::Username).unique().to_owned())
            .await?;
        manager
            .create_index(Index::create().name("uq_app_user_email").table(AppUser::Table).col(AppUser::Email).unique().to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_app_user_role").table(AppUser::Table).col(AppUser::RoleId).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let indexes = [
            ("uq_company_name", "company"),
            ("uq_company_address", "company"),
            ("uq_company_phone", "company"),
            ("uq_product_name", "product"),
            ("uq_product_registration_number", "product"),
            ("idx_product_company", "product"),
            ("idx_product_sale_product", "product_sale"),
            ("idx_product_sale_date", "product_sale"),
            ("uq_app_user_username", "app_user"),
            ("uq_app_user_email", "app_user"),
            ("idx_app_user_role", "app_user"),
        ];
        for (name, table) in indexes {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Company { Table, Name, Address, Phone }

#[derive(DeriveIden)]
enum Product { Table, Name, RegistrationNumber, CompanyId }

#[derive(DeriveIden)]
enum ProductSale { Table, ProductId, Date }

#[derive(DeriveIden)]
enum AppUser { Table, Username, Email, RoleId }
