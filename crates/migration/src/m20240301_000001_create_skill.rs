//! Create `skill` table.
//!
//! Skill names are unique; `authorized` marks curated entries.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skill::Table)
                    .if_not_exists()
                    .col(string_len(Skill::Id, 15).primary_key())
                    .col(string_len(Skill::Name, 255).unique_key().not_null())
                    .col(boolean(Skill::Authorized).not_null().default(false))
                    .col(timestamp_with_time_zone(Skill::Added).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Skill::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Skill { Table, Id, Name, Authorized, Added }
