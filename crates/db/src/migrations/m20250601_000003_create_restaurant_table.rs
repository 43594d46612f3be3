//! Create restaurant table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurant::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Restaurant::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_category")
                            .from(Restaurant::Table, Restaurant::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for dependent-row checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_category_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
    Name,
    CategoryId,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
