//! Prompt service.
//!
//! Owner-scoped CRUD, listing and copying. Vote counters are never written
//! here; they belong to [`crate::services::vote`].

use chrono::Utc;
use promptvault_common::{AppError, AppResult, IdGenerator};
use promptvault_db::entities::{prompt, user};
use promptvault_db::map_db_err;
use promptvault_db::repositories::{PromptRepository, TagRepository};
use sea_orm::{ConnectionTrait, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::pagination::{Page, PageWindow};
use crate::services::tag::{MAX_TAG_LENGTH, normalize_tag_names};
use crate::visibility;

/// Input for creating a prompt.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePromptInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub prompt_text: String,
    #[serde(default)]
    pub is_public: bool,
    /// Tags to attach. Absent and empty both mean no tags.
    pub tag_names: Option<Vec<String>>,
}

/// Input for updating a prompt. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePromptInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub prompt_text: Option<String>,
    pub is_public: Option<bool>,
    /// Absent leaves tags as they are; present replaces them exactly, so an
    /// empty list clears them.
    pub tag_names: Option<Vec<String>>,
}

/// Prompt service for business logic.
#[derive(Clone)]
pub struct PromptService {
    prompt_repo: PromptRepository,
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

impl PromptService {
    /// Create a new prompt service.
    #[must_use]
    pub const fn new(prompt_repo: PromptRepository, tag_repo: TagRepository) -> Self {
        Self {
            prompt_repo,
            tag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a prompt owned by `owner`.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreatePromptInput,
    ) -> AppResult<prompt::Model> {
        input.validate()?;
        let tag_names = checked_tag_names(input.tag_names.as_deref().unwrap_or_default())?;

        let now = Utc::now();
        let model = prompt::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id.clone()),
            title: Set(input.title),
            prompt_text: Set(input.prompt_text),
            is_public: Set(input.is_public),
            upvotes: Set(0),
            downvotes: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let txn = self.prompt_repo.begin().await?;
        let created = self.prompt_repo.create(&txn, model).await?;
        if !tag_names.is_empty() {
            self.replace_tags(&txn, &created.id, &tag_names).await?;
        }
        txn.commit().await.map_err(map_db_err)?;

        info!(prompt_id = %created.id, user_id = %owner.id, "Prompt created");
        Ok(created)
    }

    /// Get a prompt the viewer may see. Hidden prompts read as missing.
    pub async fn get(&self, id: &str, viewer: Option<&user::Model>) -> AppResult<prompt::Model> {
        let prompt = self.prompt_repo.get_by_id(id).await?;

        if !visibility::can_view(&prompt, viewer) {
            return Err(AppError::PromptNotFound(id.to_string()));
        }

        Ok(prompt)
    }

    /// Get a prompt for modification by `user`.
    async fn get_owned(&self, id: &str, user: &user::Model) -> AppResult<prompt::Model> {
        let prompt = self.get(id, Some(user)).await?;

        if !visibility::can_modify(&prompt, user) {
            return Err(AppError::Forbidden("Not the prompt owner".to_string()));
        }

        Ok(prompt)
    }

    /// Update a prompt. Owner only.
    pub async fn update(
        &self,
        user: &user::Model,
        id: &str,
        input: UpdatePromptInput,
    ) -> AppResult<prompt::Model> {
        input.validate()?;
        let tag_names = input
            .tag_names
            .as_deref()
            .map(checked_tag_names)
            .transpose()?;

        let prompt = self.get_owned(id, user).await?;

        let mut active: prompt::ActiveModel = prompt.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(prompt_text) = input.prompt_text {
            active.prompt_text = Set(prompt_text);
        }
        if let Some(is_public) = input.is_public {
            active.is_public = Set(is_public);
        }
        active.updated_at = Set(Utc::now().into());

        let txn = self.prompt_repo.begin().await?;
        let updated = self.prompt_repo.update(&txn, active).await?;
        if let Some(tag_names) = tag_names {
            self.replace_tags(&txn, id, &tag_names).await?;
        }
        txn.commit().await.map_err(map_db_err)?;

        info!(prompt_id = %id, user_id = %user.id, "Prompt updated");
        Ok(updated)
    }

    /// Delete a prompt with its votes and tag links. Owner only.
    pub async fn delete(&self, user: &user::Model, id: &str) -> AppResult<()> {
        self.get_owned(id, user).await?;
        self.prompt_repo.delete(id).await?;

        info!(prompt_id = %id, user_id = %user.id, "Prompt deleted");
        Ok(())
    }

    /// List prompts visible to `viewer`, newest first.
    pub async fn list(
        &self,
        viewer: &user::Model,
        is_public: Option<bool>,
        window: PageWindow,
    ) -> AppResult<Page<prompt::Model>> {
        let filter = visibility::list_filter(viewer, is_public);

        let count = self.prompt_repo.count_filtered(&filter).await?;
        window.check(count)?;

        let items = if count == 0 {
            vec![]
        } else {
            self.prompt_repo
                .find_filtered(&filter, window.offset(), window.page_size)
                .await?
        };

        Ok(window.into_page(count, items))
    }

    /// Copy a visible prompt into `user`'s library as a new private prompt
    /// with the same tags and fresh counters.
    pub async fn copy(&self, user: &user::Model, id: &str) -> AppResult<prompt::Model> {
        let source = self.get(id, Some(user)).await?;
        let tag_ids: Vec<String> = self
            .tag_repo
            .find_for_prompts(std::slice::from_ref(&source.id))
            .await?
            .remove(&source.id)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect();

        let now = Utc::now();
        let model = prompt::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id.clone()),
            title: Set(source.title),
            prompt_text: Set(source.prompt_text),
            is_public: Set(false),
            upvotes: Set(0),
            downvotes: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let txn = self.prompt_repo.begin().await?;
        let copied = self.prompt_repo.create(&txn, model).await?;
        if !tag_ids.is_empty() {
            self.tag_repo
                .set_prompt_tags(&txn, &copied.id, &tag_ids)
                .await?;
        }
        txn.commit().await.map_err(map_db_err)?;

        info!(source_id = %id, prompt_id = %copied.id, user_id = %user.id, "Prompt copied");
        Ok(copied)
    }

    async fn replace_tags<C: ConnectionTrait>(
        &self,
        conn: &C,
        prompt_id: &str,
        tag_names: &[String],
    ) -> AppResult<()> {
        let mut tag_ids = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            let tag = self
                .tag_repo
                .get_or_create(conn, self.id_gen.generate(), name)
                .await?;
            tag_ids.push(tag.id);
        }

        self.tag_repo
            .set_prompt_tags(conn, prompt_id, &tag_ids)
            .await
    }
}

fn checked_tag_names(names: &[String]) -> AppResult<Vec<String>> {
    let names = normalize_tag_names(names);
    if let Some(long) = names.iter().find(|n| n.chars().count() > MAX_TAG_LENGTH) {
        return Err(AppError::Validation(format!(
            "Tag name longer than {MAX_TAG_LENGTH} characters: {long}"
        )));
    }
    Ok(names)
}
