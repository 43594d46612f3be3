//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).integer().not_null())
                    .col(ColumnDef::new(Review::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(Review::Rating).integer().not_null())
                    .col(ColumnDef::new(Review::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_restaurant")
                            .from(Review::Table, Review::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: restaurant_id (for dependent-row checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_restaurant_id")
                    .table(Review::Table)
                    .col(Review::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_id")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for "latest reviews")
        manager
            .create_index(
                Index::create()
                    .name("idx_review_created_at")
                    .table(Review::Table)
                    .col(Review::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    UserId,
    RestaurantId,
    Rating,
    Comment,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
}
