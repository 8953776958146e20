use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Partnership: role lookups
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_partnership_mentor")
                    .table(Partnership::Table)
                    .col(Partnership::IdMentor)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_partnership_apprentice")
                    .table(Partnership::Table)
                    .col(Partnership::IdApprentice)
                    .to_owned(),
            )
            .await?;

        // UserSkill: reverse lookup by skill
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_skill_skill")
                    .table(UserSkill::Table)
                    .col(UserSkill::SkillId)
                    .to_owned(),
            )
            .await?;

        // User: listing order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_name")
                    .table(User::Table)
                    .col(User::LastName)
                    .col(User::FirstName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_name").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_skill_skill").table(UserSkill::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_partnership_apprentice").table(Partnership::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_partnership_mentor").table(Partnership::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, FirstName, LastName }

#[derive(DeriveIden)]
enum UserSkill { Table, SkillId }

#[derive(DeriveIden)]
enum Partnership { Table, IdMentor, IdApprentice }
