//! Create prompt table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prompt::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prompt::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Prompt::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Prompt::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Prompt::PromptText).text().not_null())
                    .col(ColumnDef::new(Prompt::IsPublic).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Prompt::Upvotes)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Prompt::Upvotes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Prompt::Downvotes)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Prompt::Downvotes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Prompt::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prompt::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prompt_user")
                            .from(Prompt::Table, Prompt::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (user_id, created_at) for owner listings
        manager
            .create_index(
                Index::create()
                    .name("idx_prompt_user_id_created_at")
                    .table(Prompt::Table)
                    .col(Prompt::UserId)
                    .col(Prompt::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Composite index: (is_public, created_at) for trending candidates
        manager
            .create_index(
                Index::create()
                    .name("idx_prompt_is_public_created_at")
                    .table(Prompt::Table)
                    .col(Prompt::IsPublic)
                    .col(Prompt::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prompt::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Prompt {
    Table,
    Id,
    UserId,
    Title,
    PromptText,
    IsPublic,
    Upvotes,
    Downvotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
