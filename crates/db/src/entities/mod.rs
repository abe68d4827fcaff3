//! Database entities.

#![allow(missing_docs)]

pub mod prompt;
pub mod prompt_tag;
pub mod tag;
pub mod user;
pub mod vote;

pub use prompt::Entity as Prompt;
pub use prompt_tag::Entity as PromptTag;
pub use tag::Entity as Tag;
pub use user::Entity as User;
pub use vote::Entity as Vote;
