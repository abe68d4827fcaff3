//! Database repositories.

pub mod prompt;
pub mod tag;
pub mod user;
pub mod vote;

pub use prompt::{PromptFilter, PromptRepository};
pub use tag::TagRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
