//! Create `partnership` table.
//!
//! Mentor and apprentice ids are plain columns; user existence is not enforced.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partnership::Table)
                    .if_not_exists()
                    .col(string_len(Partnership::Id, 15).primary_key())
                    .col(string_len(Partnership::IdMentor, 15).not_null())
                    .col(string_len(Partnership::IdApprentice, 15).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Partnership::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Partnership { Table, Id, IdMentor, IdApprentice }
