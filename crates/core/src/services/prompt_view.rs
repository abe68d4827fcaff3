//! Prompt listing hydration.
//!
//! Attaches author names, tags and the viewer's own vote to a batch of
//! prompts with one query per concern, whatever the batch size.

use std::collections::HashMap;

use promptvault_common::{AppError, AppResult};
use promptvault_db::entities::{prompt, user, vote::VoteType};
use promptvault_db::repositories::{TagRepository, UserRepository, VoteRepository};

use crate::pagination::Page;
use crate::services::user::display_name;

/// A prompt ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub prompt: prompt::Model,
    /// Display name of the owner.
    pub author_username: String,
    /// Tag names, sorted.
    pub tags: Vec<String>,
    /// `None` for anonymous viewers; `Some(None)` when the viewer has not voted.
    pub user_vote: Option<Option<VoteType>>,
}

impl PromptView {
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.prompt.score()
    }
}

/// Builds [`PromptView`]s.
#[derive(Clone)]
pub struct PromptViewService {
    user_repo: UserRepository,
    tag_repo: TagRepository,
    vote_repo: VoteRepository,
}

impl PromptViewService {
    /// Create a new prompt view service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        tag_repo: TagRepository,
        vote_repo: VoteRepository,
    ) -> Self {
        Self {
            user_repo,
            tag_repo,
            vote_repo,
        }
    }

    /// Hydrate a batch, keeping its order.
    pub async fn hydrate(
        &self,
        prompts: Vec<prompt::Model>,
        viewer: Option<&user::Model>,
    ) -> AppResult<Vec<PromptView>> {
        if prompts.is_empty() {
            return Ok(vec![]);
        }

        let prompt_ids: Vec<String> = prompts.iter().map(|p| p.id.clone()).collect();

        let mut owner_ids: Vec<String> = prompts.iter().map(|p| p.user_id.clone()).collect();
        owner_ids.sort();
        owner_ids.dedup();

        let authors: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&owner_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), display_name(u)))
            .collect();

        let mut tags = self.tag_repo.find_for_prompts(&prompt_ids).await?;

        let votes = match viewer {
            Some(viewer) => Some(
                self.vote_repo
                    .find_for_prompts(&viewer.id, &prompt_ids)
                    .await?,
            ),
            None => None,
        };

        Ok(prompts
            .into_iter()
            .map(|prompt| {
                let author_username = authors
                    .get(&prompt.user_id)
                    .cloned()
                    .unwrap_or_else(|| prompt.user_id.clone());
                let tags = tags
                    .remove(&prompt.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                let user_vote = votes.as_ref().map(|v| v.get(&prompt.id).copied());

                PromptView {
                    prompt,
                    author_username,
                    tags,
                    user_vote,
                }
            })
            .collect())
    }

    /// Hydrate a single prompt.
    pub async fn hydrate_one(
        &self,
        prompt: prompt::Model,
        viewer: Option<&user::Model>,
    ) -> AppResult<PromptView> {
        let id = prompt.id.clone();
        self.hydrate(vec![prompt], viewer)
            .await?
            .pop()
            .ok_or(AppError::PromptNotFound(id))
    }

    /// Hydrate the items of a page.
    pub async fn hydrate_page(
        &self,
        page: Page<prompt::Model>,
        viewer: Option<&user::Model>,
    ) -> AppResult<Page<PromptView>> {
        let Page {
            count,
            next,
            previous,
            page,
            page_size,
            items,
        } = page;

        Ok(Page {
            count,
            next,
            previous,
            page,
            page_size,
            items: self.hydrate(items, viewer).await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use promptvault_db::entities::{prompt_tag, tag, vote};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_prompt(id: &str, owner: &str) -> prompt::Model {
        prompt::Model {
            id: id.to_string(),
            user_id: owner.to_string(),
            title: "Title".to_string(),
            prompt_text: "Text".to_string(),
            is_public: true,
            upvotes: 2,
            downvotes: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: None,
            token: None,
            is_admin: false,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection) -> PromptViewService {
        let db = Arc::new(db);
        PromptViewService::new(
            UserRepository::new(Arc::clone(&db)),
            TagRepository::new(Arc::clone(&db)),
            VoteRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_hydrate_anonymous_has_no_user_vote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("alice", "alice")]])
            .append_query_results([[prompt_tag::Model {
                prompt_id: "p1".to_string(),
                tag_id: "t1".to_string(),
            }]])
            .append_query_results([[tag::Model {
                id: "t1".to_string(),
                name: "coding".to_string(),
            }]])
            .into_connection();

        let views = service(db)
            .hydrate(
                vec![create_test_prompt("p1", "alice"), create_test_prompt("p2", "alice")],
                None,
            )
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].author_username, "alice");
        assert_eq!(views[0].tags, vec!["coding"]);
        assert!(views[1].tags.is_empty());
        assert_eq!(views[0].user_vote, None);
        assert_eq!(views[0].score(), 2);
    }

    #[tokio::test]
    async fn test_hydrate_viewer_votes_in_one_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("alice", "alice")]])
            .append_query_results([Vec::<prompt_tag::Model>::new()])
            .append_query_results([[vote::Model {
                id: "v1".to_string(),
                user_id: "bob".to_string(),
                prompt_id: "p2".to_string(),
                vote_type: VoteType::Down,
                created_at: Utc::now().into(),
            }]])
            .into_connection();

        let viewer = create_test_user("bob", "bob");
        let views = service(db)
            .hydrate(
                vec![create_test_prompt("p1", "alice"), create_test_prompt("p2", "alice")],
                Some(&viewer),
            )
            .await
            .unwrap();

        assert_eq!(views[0].user_vote, Some(None));
        assert_eq!(views[1].user_vote, Some(Some(VoteType::Down)));
    }

    #[tokio::test]
    async fn test_hydrate_empty_batch_skips_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let views = service(db).hydrate(vec![], None).await.unwrap();
        assert!(views.is_empty());
    }
}
