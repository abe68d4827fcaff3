//! API response types.

use promptvault_core::{Page, PromptView, VoteOutcome};
use promptvault_db::entities::{tag, user, vote::VoteType};
use serde::Serialize;

/// A page of results with navigation metadata.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Convert a page, mapping each item.
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.items,
        }
    }
}

/// Prompt response.
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub id: String,
    pub author_username: String,
    pub title: String,
    pub prompt_text: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
    pub score: i64,
    pub upvotes: i32,
    pub downvotes: i32,
    /// Omitted for anonymous callers, `null` when the caller has not voted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Option<VoteType>>,
}

impl From<PromptView> for PromptResponse {
    fn from(view: PromptView) -> Self {
        let score = view.score();
        let p = view.prompt;
        Self {
            id: p.id,
            author_username: view.author_username,
            title: p.title,
            prompt_text: p.prompt_text,
            tags: view.tags,
            is_public: p.is_public,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
            score,
            upvotes: p.upvotes,
            downvotes: p.downvotes,
            user_vote: view.user_vote,
        }
    }
}

/// Result of an upvote or downvote.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: String,
    pub score: i64,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            score: outcome.score(),
            id: outcome.prompt_id,
        }
    }
}

/// Result of a vote removal. `user_vote` is always `null`.
#[derive(Debug, Serialize)]
pub struct RemoveVoteResponse {
    pub id: String,
    pub score: i64,
    pub upvotes: i32,
    pub downvotes: i32,
    pub user_vote: Option<VoteType>,
}

impl From<VoteOutcome> for RemoveVoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            score: outcome.score(),
            id: outcome.prompt_id,
            upvotes: outcome.upvotes,
            downvotes: outcome.downvotes,
            user_vote: None,
        }
    }
}

/// Tag response.
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

/// Current user response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}
