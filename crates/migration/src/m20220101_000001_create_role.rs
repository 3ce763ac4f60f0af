//! Create `role` reference table and seed the fixed role set.
//!
//! Ids are stable: 1 = Admin, 2 = Manager, 3 = Employee.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(integer(Role::Id).primary_key())
                    .col(string_len(Role::Name, 32).unique_key())
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(Role::Table)
            .columns([Role::Id, Role::Name])
            .values_panic([1.into(), "Admin".into()])
            .values_panic([2.into(), "Manager".into()])
            .values_panic([3.into(), "Employee".into()])
            .to_owned();
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Role::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Role { Table, Id, Name }
