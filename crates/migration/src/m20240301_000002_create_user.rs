//! Create `user` table.
//!
//! Social handles are optional; availability flags default to false.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 15).primary_key())
                    .col(string_len(User::FirstName, 128).not_null())
                    .col(string_len(User::LastName, 128).not_null())
                    .col(string_len(User::Email, 255).not_null())
                    .col(ColumnDef::new(User::Github).string_len(64).null())
                    .col(ColumnDef::new(User::Twitter).string_len(64).null())
                    .col(ColumnDef::new(User::Irc).string_len(64).null())
                    .col(boolean(User::IsMentor).not_null().default(false))
                    .col(boolean(User::IsApprentice).not_null().default(false))
                    .col(string_len(User::Timezone, 64).not_null())
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Github,
    Twitter,
    Irc,
    IsMentor,
    IsApprentice,
    Timezone,
    CreatedAt,
    UpdatedAt,
}
