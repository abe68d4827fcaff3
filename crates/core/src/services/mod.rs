//! Business logic services.

#![allow(missing_docs)]

pub mod prompt;
pub mod prompt_view;
pub mod tag;
pub mod trending;
pub mod user;
pub mod vote;

pub use prompt::{CreatePromptInput, PromptService, UpdatePromptInput};
pub use prompt_view::{PromptView, PromptViewService};
pub use tag::{TagService, normalize_tag_names};
pub use trending::{RankedPrompt, TrendingService, rank, trending_score};
pub use user::{UserService, display_name};
pub use vote::{Transition, VoteAction, VoteOutcome, VoteService, plan_transition};
