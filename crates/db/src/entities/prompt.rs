//! Prompt entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prompt")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner; the only user allowed to edit or delete the prompt
    #[sea_orm(indexed)]
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub prompt_text: String,

    /// Gates voting and trending eligibility
    #[sea_orm(default_value = false)]
    pub is_public: bool,

    /// Upvote count (denormalized from the vote ledger)
    #[sea_orm(default_value = 0)]
    pub upvotes: i32,

    /// Downvote count (denormalized from the vote ledger)
    #[sea_orm(default_value = 0)]
    pub downvotes: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Net score: upvotes minus downvotes.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,

    #[sea_orm(has_many = "super::prompt_tag::Entity")]
    PromptTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::prompt_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromptTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
