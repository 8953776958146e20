//! Create `user_skill` link table.
//!
//! One row per (user, skill, relation) where relation is `teaching` or `learning`.
//! No foreign keys: skill and user deletes do not cascade here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSkill::Table)
                    .if_not_exists()
                    .col(string_len(UserSkill::UserId, 15).not_null())
                    .col(string_len(UserSkill::SkillId, 15).not_null())
                    .col(string_len(UserSkill::Relation, 16).not_null())
                    .primary_key(
                        Index::create()
                            .col(UserSkill::UserId)
                            .col(UserSkill::SkillId)
                            .col(UserSkill::Relation),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserSkill::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserSkill { Table, UserId, SkillId, Relation }
