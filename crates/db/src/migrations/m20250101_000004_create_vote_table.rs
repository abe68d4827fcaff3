//! Create vote ledger table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Vote::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::PromptId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Vote::VoteType)
                            .string_len(8)
                            .not_null()
                            .check(Expr::col(Vote::VoteType).is_in(["up", "down"])),
                    )
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_user")
                            .from(Vote::Table, Vote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_prompt")
                            .from(Vote::Table, Vote::PromptId)
                            .to(Prompt::Table, Prompt::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, prompt_id) - one vote per user per prompt.
        // The upsert in VoteRepository targets this index.
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_user_prompt")
                    .table(Vote::Table)
                    .col(Vote::UserId)
                    .col(Vote::PromptId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: prompt_id (for ledger counts per prompt)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_prompt_id")
                    .table(Vote::Table)
                    .col(Vote::PromptId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    UserId,
    PromptId,
    VoteType,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Prompt {
    Table,
    Id,
}
