//! Create `product_sale` table with FK to `product`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductSale::Table)
                    .if_not_exists()
                    .col(pk_auto(ProductSale::Id))
                    .col(integer(ProductSale::ProductId))
                    .col(integer(ProductSale::Amount))
                    .col(decimal_len(ProductSale::PricePerUnit, 18, 2))
                    .col(timestamp_with_time_zone(ProductSale::Date))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_sale_product")
                            .from(ProductSale::Table, ProductSale::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProductSale::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProductSale { Table, Id, ProductId, Amount, PricePerUnit, Date }

#[derive(DeriveIden)]
enum Product { Table, Id }
