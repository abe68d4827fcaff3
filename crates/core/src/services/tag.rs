//! Tag service.

use promptvault_common::AppResult;
use promptvault_db::{entities::tag, repositories::TagRepository};

/// Maximum tag name length.
pub const MAX_TAG_LENGTH: usize = 50;

/// Canonicalize tag names: trim, lower-case, drop empties and duplicates.
/// First occurrence wins the position.
#[must_use]
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !normalized.contains(&name) {
            normalized.push(name);
        }
    }
    normalized
}

/// Tag service for business logic.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub const fn new(tag_repo: TagRepository) -> Self {
        Self { tag_repo }
    }

    /// List all tags ordered by name.
    pub async fn list(&self) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.find_all().await
    }
}
