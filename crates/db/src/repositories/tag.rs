//! Tag repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{PromptTag, Tag, prompt_tag, tag};
use crate::map_db_err;
use promptvault_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List all tags ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get a tag by name, creating it with `new_id` if it does not exist.
    ///
    /// Uses `INSERT ... ON CONFLICT DO NOTHING` so concurrent creators of the
    /// same name converge on one row.
    pub async fn get_or_create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_id: String,
        name: &str,
    ) -> AppResult<tag::Model> {
        let model = tag::ActiveModel {
            id: Set(new_id),
            name: Set(name.to_string()),
        };

        Tag::insert(model)
            .on_conflict(
                OnConflict::column(tag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(map_db_err)?;

        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::Internal(format!("Tag vanished after upsert: {name}")))
    }

    /// Replace the tag set of a prompt.
    pub async fn set_prompt_tags<C: ConnectionTrait>(
        &self,
        conn: &C,
        prompt_id: &str,
        tag_ids: &[String],
    ) -> AppResult<()> {
        PromptTag::delete_many()
            .filter(prompt_tag::Column::PromptId.eq(prompt_id))
            .exec(conn)
            .await
            .map_err(map_db_err)?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| prompt_tag::ActiveModel {
            prompt_id: Set(prompt_id.to_string()),
            tag_id: Set(tag_id.clone()),
        });

        PromptTag::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Load the tags of several prompts in two queries.
    ///
    /// Prompts without tags map to an empty list.
    pub async fn find_for_prompts(
        &self,
        prompt_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<tag::Model>>> {
        let mut by_prompt: HashMap<String, Vec<tag::Model>> = prompt_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        if prompt_ids.is_empty() {
            return Ok(by_prompt);
        }

        let links = PromptTag::find()
            .filter(prompt_tag::Column::PromptId.is_in(prompt_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if links.is_empty() {
            return Ok(by_prompt);
        }

        let mut tag_ids: Vec<String> = links.iter().map(|l| l.tag_id.clone()).collect();
        tag_ids.sort();
        tag_ids.dedup();

        let tags: HashMap<String, tag::Model> = Tag::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        for link in links {
            if let Some(t) = tags.get(&link.tag_id) {
                by_prompt.entry(link.prompt_id).or_default().push(t.clone());
            }
        }

        for list in by_prompt.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(by_prompt)
    }
}
