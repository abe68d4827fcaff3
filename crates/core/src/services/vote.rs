//! Vote transition engine.
//!
//! Each (user, prompt) pair is in one of three states: no vote, up or down.
//! [`plan_transition`] decides the new state and counter deltas for an
//! action; [`VoteService`] applies the plan to the ledger and the prompt
//! counters inside one transaction.

use std::fmt;
use std::time::Duration;

use promptvault_common::{AppError, AppResult, IdGenerator};
use promptvault_db::entities::vote::VoteType;
use promptvault_db::map_db_err;
use promptvault_db::repositories::{PromptRepository, VoteRepository};
use sea_orm::DbErr;
use tracing::{debug, warn};

/// Base delay between retries of a transition; doubled on every attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(20);

/// What the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Downvote,
    Remove,
}

impl VoteAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::Remove => "remove_vote",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The effect of an accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Ledger state after the action; `None` deletes the entry.
    pub new_state: Option<VoteType>,
    pub upvotes_delta: i32,
    pub downvotes_delta: i32,
}

/// Decide how `action` moves a pair out of `current`.
///
/// Repeating the current direction fails with [`AppError::AlreadyVoted`];
/// removing an absent vote fails with [`AppError::NoVoteToRemove`].
pub fn plan_transition(current: Option<VoteType>, action: VoteAction) -> AppResult<Transition> {
    let (new_state, upvotes_delta, downvotes_delta) = match (current, action) {
        (None, VoteAction::Upvote) => (Some(VoteType::Up), 1, 0),
        (None, VoteAction::Downvote) => (Some(VoteType::Down), 0, 1),
        (Some(VoteType::Up), VoteAction::Downvote) => (Some(VoteType::Down), -1, 1),
        (Some(VoteType::Down), VoteAction::Upvote) => (Some(VoteType::Up), 1, -1),
        (Some(VoteType::Up), VoteAction::Remove) => (None, -1, 0),
        (Some(VoteType::Down), VoteAction::Remove) => (None, 0, -1),
        (Some(same @ VoteType::Up), VoteAction::Upvote)
        | (Some(same @ VoteType::Down), VoteAction::Downvote) => {
            return Err(AppError::AlreadyVoted(same.past_tense().to_string()));
        }
        (None, VoteAction::Remove) => return Err(AppError::NoVoteToRemove),
    };

    Ok(Transition {
        new_state,
        upvotes_delta,
        downvotes_delta,
    })
}

/// Classify a failed commit.
///
/// A transient error at commit time may hide a commit the server already
/// applied. Re-running the transition would then report `AlreadyVoted` for an
/// action that went through, so such failures are never retried.
fn commit_failure(err: DbErr) -> AppError {
    match map_db_err(err) {
        AppError::Retryable(reason) => AppError::CommitUncertain(reason),
        other => other,
    }
}

/// Counters and ledger state after a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub prompt_id: String,
    pub upvotes: i32,
    pub downvotes: i32,
    /// The caller's vote after the action; `None` after a removal.
    pub user_vote: Option<VoteType>,
}

impl VoteOutcome {
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    prompt_repo: PromptRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
    max_retries: u32,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(prompt_repo: PromptRepository, vote_repo: VoteRepository) -> Self {
        Self {
            prompt_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
            max_retries: 3,
        }
    }

    /// Set how often a transition is re-attempted after a retryable failure.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Upvote a public prompt.
    pub async fn upvote(&self, user_id: &str, prompt_id: &str) -> AppResult<VoteOutcome> {
        self.apply(user_id, prompt_id, VoteAction::Upvote).await
    }

    /// Downvote a public prompt.
    pub async fn downvote(&self, user_id: &str, prompt_id: &str) -> AppResult<VoteOutcome> {
        self.apply(user_id, prompt_id, VoteAction::Downvote).await
    }

    /// Withdraw the caller's vote on a public prompt.
    pub async fn remove_vote(&self, user_id: &str, prompt_id: &str) -> AppResult<VoteOutcome> {
        self.apply(user_id, prompt_id, VoteAction::Remove).await
    }

    /// Apply an action, retrying transient store failures.
    pub async fn apply(
        &self,
        user_id: &str,
        prompt_id: &str,
        action: VoteAction,
    ) -> AppResult<VoteOutcome> {
        let mut attempt = 0;
        loop {
            match self.try_apply(user_id, prompt_id, action).await {
                Err(AppError::Retryable(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        user_id = %user_id,
                        prompt_id = %prompt_id,
                        action = %action,
                        attempt,
                        reason = %reason,
                        "Retrying vote transition"
                    );
                    tokio::time::sleep(RETRY_BASE_DELAY * 2u32.saturating_pow(attempt - 1)).await;
                }
                result => return result,
            }
        }
    }

    /// One attempt: lock the prompt, read the ledger, write both, commit.
    /// Any early return drops the transaction, which rolls it back.
    async fn try_apply(
        &self,
        user_id: &str,
        prompt_id: &str,
        action: VoteAction,
    ) -> AppResult<VoteOutcome> {
        let txn = self.vote_repo.begin().await?;

        let prompt = self
            .prompt_repo
            .find_public_for_update(&txn, prompt_id)
            .await?
            .ok_or_else(|| AppError::PromptNotFound(prompt_id.to_string()))?;

        let current = self
            .vote_repo
            .find_in(&txn, user_id, prompt_id)
            .await?
            .map(|v| v.vote_type);

        let transition = plan_transition(current, action)?;

        match transition.new_state {
            Some(vote_type) => {
                self.vote_repo
                    .upsert(&txn, self.id_gen.generate(), user_id, prompt_id, vote_type)
                    .await?;
            }
            None => self.vote_repo.remove(&txn, user_id, prompt_id).await?,
        }

        self.prompt_repo
            .apply_vote_delta(
                &txn,
                prompt_id,
                transition.upvotes_delta,
                transition.downvotes_delta,
            )
            .await?;

        txn.commit().await.map_err(commit_failure)?;

        let outcome = VoteOutcome {
            prompt_id: prompt.id,
            upvotes: prompt.upvotes + transition.upvotes_delta,
            downvotes: prompt.downvotes + transition.downvotes_delta,
            user_vote: transition.new_state,
        };

        debug!(
            user_id = %user_id,
            prompt_id = %prompt_id,
            action = %action,
            score = outcome.score(),
            "Vote transition applied"
        );

        Ok(outcome)
    }
}
