//! Create presence vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PresenceVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PresenceVote::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PresenceVote::UserId).integer().not_null())
                    .col(ColumnDef::new(PresenceVote::Presence).string_len(10).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presence_vote_user")
                            .from(PresenceVote::Table, PresenceVote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id - one presence row per user, target of upserts
        manager
            .create_index(
                Index::create()
                    .name("idx_presence_vote_user_id")
                    .table(PresenceVote::Table)
                    .col(PresenceVote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PresenceVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PresenceVote {
    Table,
    Id,
    UserId,
    Presence,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
