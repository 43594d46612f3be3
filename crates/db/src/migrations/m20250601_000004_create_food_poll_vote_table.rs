//! Create food poll vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoodPollVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodPollVote::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FoodPollVote::UserId).integer().not_null())
                    .col(ColumnDef::new(FoodPollVote::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_poll_vote_user")
                            .from(FoodPollVote::Table, FoodPollVote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_poll_vote_category")
                            .from(FoodPollVote::Table, FoodPollVote::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, category_id) - lookup for toggles; duplicates are
        // kept out by the toggle itself, not by the index
        manager
            .create_index(
                Index::create()
                    .name("idx_food_poll_vote_user_category")
                    .table(FoodPollVote::Table)
                    .col(FoodPollVote::UserId)
                    .col(FoodPollVote::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for tallies and cascades)
        manager
            .create_index(
                Index::create()
                    .name("idx_food_poll_vote_category_id")
                    .table(FoodPollVote::Table)
                    .col(FoodPollVote::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodPollVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FoodPollVote {
    Table,
    Id,
    UserId,
    CategoryId,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
