//! Which prompts a caller may see, list or change.
//!
//! Voting is closed on private prompts for every caller; the vote engine
//! enforces that in its row-locking query.

use promptvault_db::entities::{prompt, user};
use promptvault_db::repositories::PromptFilter;

/// Filter for an owner-scoped listing.
///
/// An explicit `is_public = true` lists every public prompt. Otherwise
/// administrators see everything matching the flag and other callers only
/// their own prompts.
#[must_use]
pub fn list_filter(viewer: &user::Model, is_public: Option<bool>) -> PromptFilter {
    let owner_id = match is_public {
        Some(true) => None,
        _ if viewer.is_admin => None,
        _ => Some(viewer.id.clone()),
    };

    PromptFilter {
        owner_id,
        is_public,
        tag: None,
    }
}

/// Filter for the trending candidate set: public prompts, optionally carrying
/// a tag (case-insensitive). A blank tag means no tag filter.
#[must_use]
pub fn trending_filter(tag: Option<&str>) -> PromptFilter {
    PromptFilter {
        owner_id: None,
        is_public: Some(true),
        tag: tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    }
}

/// Whether `viewer` may read `prompt`.
#[must_use]
pub fn can_view(prompt: &prompt::Model, viewer: Option<&user::Model>) -> bool {
    prompt.is_public || viewer.is_some_and(|u| u.is_admin || u.id == prompt.user_id)
}

/// Whether `user` may change or delete `prompt`. Only the owner may.
#[must_use]
pub fn can_modify(prompt: &prompt::Model, user: &user::Model) -> bool {
    prompt.user_id == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            email: None,
            token: None,
            is_admin,
            created_at: Utc::now().into(),
        }
    }

    fn prompt(owner: &str, is_public: bool) -> prompt::Model {
        prompt::Model {
            id: "p1".to_string(),
            user_id: owner.to_string(),
            title: "Title".to_string(),
            prompt_text: "Text".to_string(),
            is_public,
            upvotes: 0,
            downvotes: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_list_filter_defaults_to_own_prompts() {
        let filter = list_filter(&user("alice", false), None);
        assert_eq!(filter.owner_id.as_deref(), Some("alice"));
        assert_eq!(filter.is_public, None);
    }

    #[test]
    fn test_list_filter_admin_sees_all() {
        let filter = list_filter(&user("root", true), None);
        assert_eq!(filter.owner_id, None);
        assert_eq!(filter.is_public, None);
    }

    #[test]
    fn test_list_filter_public_flag_lists_everyones_public() {
        let filter = list_filter(&user("alice", false), Some(true));
        assert_eq!(filter.owner_id, None);
        assert_eq!(filter.is_public, Some(true));
    }

    #[test]
    fn test_list_filter_private_flag_stays_owner_scoped() {
        let filter = list_filter(&user("alice", false), Some(false));
        assert_eq!(filter.owner_id.as_deref(), Some("alice"));
        assert_eq!(filter.is_public, Some(false));

        let filter = list_filter(&user("root", true), Some(false));
        assert_eq!(filter.owner_id, None);
    }

    #[test]
    fn test_trending_filter() {
        let filter = trending_filter(Some(" Coding "));
        assert_eq!(filter.is_public, Some(true));
        assert_eq!(filter.tag.as_deref(), Some("Coding"));

        assert_eq!(trending_filter(Some("  ")).tag, None);
        assert_eq!(trending_filter(None).tag, None);
    }

    #[test]
    fn test_can_view() {
        let private = prompt("alice", false);
        assert!(can_view(&private, Some(&user("alice", false))));
        assert!(can_view(&private, Some(&user("root", true))));
        assert!(!can_view(&private, Some(&user("bob", false))));
        assert!(!can_view(&private, None));
        assert!(can_view(&prompt("alice", true), None));
    }

    #[test]
    fn test_only_owner_modifies() {
        let p = prompt("alice", true);
        assert!(can_modify(&p, &user("alice", false)));
        assert!(!can_modify(&p, &user("root", true)));
    }
}
