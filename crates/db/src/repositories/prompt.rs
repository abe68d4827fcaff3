//! Prompt repository.

use std::sync::Arc;

use crate::entities::{Prompt, PromptTag, Tag, prompt, prompt_tag, tag};
use crate::map_db_err;
use promptvault_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    sea_query::{Expr, Func, Query},
};

/// Which prompts a listing may see.
///
/// Built by the visibility policy in the service layer; the repository only
/// translates it into SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    /// Restrict to prompts owned by this user.
    pub owner_id: Option<String>,
    /// Restrict to public (`true`) or private (`false`) prompts.
    pub is_public: Option<bool>,
    /// Restrict to prompts carrying a tag with this name (case-insensitive).
    pub tag: Option<String>,
}

impl PromptFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(ref owner_id) = self.owner_id {
            cond = cond.add(prompt::Column::UserId.eq(owner_id.as_str()));
        }

        if let Some(is_public) = self.is_public {
            cond = cond.add(prompt::Column::IsPublic.eq(is_public));
        }

        if let Some(ref name) = self.tag {
            let tagged = Query::select()
                .column((PromptTag, prompt_tag::Column::PromptId))
                .from(PromptTag)
                .inner_join(
                    Tag,
                    Expr::col((Tag, tag::Column::Id))
                        .equals((PromptTag, prompt_tag::Column::TagId)),
                )
                .and_where(
                    Expr::expr(Func::lower(Expr::col((Tag, tag::Column::Name))))
                        .eq(name.to_lowercase()),
                )
                .to_owned();
            cond = cond.add(prompt::Column::Id.in_subquery(tagged));
        }

        cond
    }
}

/// Prompt repository for database operations.
#[derive(Clone)]
pub struct PromptRepository {
    db: Arc<DatabaseConnection>,
}

impl PromptRepository {
    /// Create a new prompt repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start a transaction. Dropping it without commit rolls back.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db.begin().await.map_err(map_db_err)
    }

    /// Find a prompt by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<prompt::Model>> {
        Prompt::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get a prompt by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<prompt::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PromptNotFound(id.to_string()))
    }

    /// Lock a public prompt row for the rest of the transaction.
    ///
    /// Returns `None` for missing and private prompts alike. Concurrent vote
    /// transitions on the same prompt queue behind this lock.
    pub async fn find_public_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<prompt::Model>> {
        Prompt::find_by_id(id)
            .filter(prompt::Column::IsPublic.eq(true))
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(map_db_err)
    }

    /// Shift the vote counters by the given deltas (single relative UPDATE).
    pub async fn apply_vote_delta<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        upvotes_delta: i32,
        downvotes_delta: i32,
    ) -> AppResult<()> {
        if upvotes_delta == 0 && downvotes_delta == 0 {
            return Ok(());
        }

        let result = Prompt::update_many()
            .col_expr(
                prompt::Column::Upvotes,
                Expr::col(prompt::Column::Upvotes).add(upvotes_delta),
            )
            .col_expr(
                prompt::Column::Downvotes,
                Expr::col(prompt::Column::Downvotes).add(downvotes_delta),
            )
            .filter(prompt::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::PromptNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Create a new prompt.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: prompt::ActiveModel,
    ) -> AppResult<prompt::Model> {
        model.insert(conn).await.map_err(map_db_err)
    }

    /// Update a prompt.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: prompt::ActiveModel,
    ) -> AppResult<prompt::Model> {
        model.update(conn).await.map_err(map_db_err)
    }

    /// Delete a prompt. Votes and tag links cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Prompt::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::PromptNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Find prompts matching a filter, newest first.
    ///
    /// Ties on `created_at` are broken by ID so the order is total.
    pub async fn find_filtered(
        &self,
        filter: &PromptFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<prompt::Model>> {
        Prompt::find()
            .filter(filter.condition())
            .order_by_desc(prompt::Column::CreatedAt)
            .order_by_desc(prompt::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Count prompts matching a filter.
    pub async fn count_filtered(&self, filter: &PromptFilter) -> AppResult<u64> {
        Prompt::find()
            .filter(filter.condition())
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
