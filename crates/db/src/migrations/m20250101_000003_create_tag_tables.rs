//! Create tag and prompt_tag tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Tag::Name).string_len(50).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromptTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PromptTag::PromptId).string_len(32).not_null())
                    .col(ColumnDef::new(PromptTag::TagId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(PromptTag::PromptId)
                            .col(PromptTag::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prompt_tag_prompt")
                            .from(PromptTag::Table, PromptTag::PromptId)
                            .to(Prompt::Table, Prompt::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prompt_tag_tag")
                            .from(PromptTag::Table, PromptTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: tag_id (for tag-filtered trending)
        manager
            .create_index(
                Index::create()
                    .name("idx_prompt_tag_tag_id")
                    .table(PromptTag::Table)
                    .col(PromptTag::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PromptTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum PromptTag {
    Table,
    PromptId,
    TagId,
}

#[derive(Iden)]
enum Prompt {
    Table,
    Id,
}
