//! Vote ledger repository.
//!
//! The ledger is the source of truth for who voted what on which prompt.
//! Writes take an explicit connection so callers can run them inside the same
//! transaction as the prompt counter update.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Vote, vote, vote::VoteType};
use crate::map_db_err;
use chrono::Utc;
use promptvault_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait, sea_query::OnConflict,
};

/// Vote ledger repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start a transaction. Dropping it without commit rolls back.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db.begin().await.map_err(map_db_err)
    }

    /// Find the current vote of a user on a prompt.
    pub async fn find(&self, user_id: &str, prompt_id: &str) -> AppResult<Option<vote::Model>> {
        self.find_in(self.db.as_ref(), user_id, prompt_id).await
    }

    /// Find the current vote of a user on a prompt using the given connection.
    pub async fn find_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        prompt_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PromptId.eq(prompt_id))
            .one(conn)
            .await
            .map_err(map_db_err)
    }

    /// Record a vote, or overwrite the direction of an existing one.
    ///
    /// `INSERT ... ON CONFLICT (user_id, prompt_id) DO UPDATE SET vote_type`,
    /// so the unique index decides whether a row is created or flipped; two
    /// rows for one pair can never coexist.
    pub async fn upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_id: String,
        user_id: &str,
        prompt_id: &str,
        vote_type: VoteType,
    ) -> AppResult<()> {
        let model = vote::ActiveModel {
            id: Set(new_id),
            user_id: Set(user_id.to_string()),
            prompt_id: Set(prompt_id.to_string()),
            vote_type: Set(vote_type),
            created_at: Set(Utc::now().into()),
        };

        Vote::insert(model)
            .on_conflict(
                OnConflict::columns([vote::Column::UserId, vote::Column::PromptId])
                    .update_column(vote::Column::VoteType)
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Delete the vote of a user on a prompt.
    ///
    /// Fails with [`AppError::NoVoteToRemove`] when there was nothing to delete.
    pub async fn remove<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        prompt_id: &str,
    ) -> AppResult<()> {
        let result = Vote::delete_many()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PromptId.eq(prompt_id))
            .exec(conn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NoVoteToRemove);
        }
        Ok(())
    }

    /// Look up one user's votes on many prompts with a single query.
    pub async fn find_for_prompts(
        &self,
        user_id: &str,
        prompt_ids: &[String],
    ) -> AppResult<HashMap<String, VoteType>> {
        if prompt_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let votes = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PromptId.is_in(prompt_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(votes
            .into_iter()
            .map(|v| (v.prompt_id, v.vote_type))
            .collect())
    }

    /// Count ledger entries of one direction for a prompt.
    pub async fn count_by_type(&self, prompt_id: &str, vote_type: VoteType) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::PromptId.eq(prompt_id))
            .filter(vote::Column::VoteType.eq(vote_type))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_vote(user_id: &str, prompt_id: &str, vote_type: VoteType) -> vote::Model {
        vote::Model {
            id: format!("v-{user_id}-{prompt_id}"),
            user_id: user_id.to_string(),
            prompt_id: prompt_id.to_string(),
            vote_type,
            created_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_existing_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_vote("u1", "p1", VoteType::Down)]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let found = repo.find("u1", "p1").await.unwrap().unwrap();

        assert_eq!(found.vote_type, VoteType::Down);
    }

    #[tokio::test]
    async fn test_find_absent_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<vote::Model>::new()])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        assert!(repo.find("u1", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_absent_vote_is_signaled() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = VoteRepository::new(Arc::clone(&db));
        let result = repo.remove(db.as_ref(), "u1", "p1").await;

        assert!(matches!(result, Err(AppError::NoVoteToRemove)));
    }

    #[tokio::test]
    async fn test_remove_existing_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = VoteRepository::new(Arc::clone(&db));
        repo.remove(db.as_ref(), "u1", "p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = VoteRepository::new(Arc::clone(&db));
        repo.upsert(db.as_ref(), "v1".to_string(), "u1", "p1", VoteType::Up)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_for_prompts_maps_by_prompt() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_vote("u1", "p1", VoteType::Up),
                    create_test_vote("u1", "p3", VoteType::Down),
                ]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let ids = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        let votes = repo.find_for_prompts("u1", &ids).await.unwrap();

        assert_eq!(votes.get("p1"), Some(&VoteType::Up));
        assert_eq!(votes.get("p2"), None);
        assert_eq!(votes.get("p3"), Some(&VoteType::Down));
    }

    #[tokio::test]
    async fn test_count_by_type() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        assert_eq!(repo.count_by_type("p1", VoteType::Up).await.unwrap(), 4);
    }
}
