//! Create `app_user` table with FK to `role`.
//!
//! Password hashes live in `user_credentials`, not here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_len(AppUser::Username, 64))
                    .col(string_len(AppUser::Email, 255))
                    .col(string_len(AppUser::FirstName, 128))
                    .col(string_len(AppUser::LastName, 128))
                    .col(integer(AppUser::RoleId))
                    .col(timestamp_with_time_zone(AppUser::CreatedAt))
                    .col(timestamp_with_time_zone(AppUser::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_role")
                            .from(AppUser::Table, AppUser::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppUser { Table, Id, Username, Email, FirstName, LastName, RoleId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Role { Table, Id }
