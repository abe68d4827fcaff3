//! Trending ranker.
//!
//! Public prompts are scored by their vote differential divided by a
//! logarithmic age decay:
//!
//! ```text
//! age_hours = (now - created_at) in hours
//! decay     = ln(age_hours + 2)
//! score     = (upvotes - downvotes) / decay
//! ```
//!
//! Ranking happens in memory over at most `max_candidates` of the newest
//! matching prompts.

use chrono::{DateTime, Utc};
use promptvault_common::{AppError, AppResult};
use promptvault_db::entities::prompt;
use promptvault_db::repositories::PromptRepository;
use tracing::{error, warn};

use crate::pagination::{Page, PageWindow};
use crate::visibility;

/// How far in the future a `created_at` may lie before it counts as
/// malformed rather than clock skew.
const MAX_CLOCK_SKEW_SECS: i64 = 5 * 60;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Trending score of one prompt at `now`.
///
/// Ages within the skew tolerance clamp to zero; anything further in the
/// future, or a score that is not finite, is an error.
pub fn trending_score(
    upvotes: i32,
    downvotes: i32,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<f64> {
    let age = now.signed_duration_since(created_at);
    if age.num_seconds() < -MAX_CLOCK_SKEW_SECS {
        return Err(AppError::Internal(format!(
            "created_at {created_at} lies in the future"
        )));
    }

    let age_hours = age.num_milliseconds().max(0) as f64 / MILLIS_PER_HOUR;
    let decay = (age_hours + 2.0).ln();
    let score = (i64::from(upvotes) - i64::from(downvotes)) as f64 / decay;

    if !score.is_finite() {
        return Err(AppError::Internal(format!(
            "non-finite trending score for created_at {created_at}"
        )));
    }

    Ok(score)
}

/// A prompt with its computed trending score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPrompt {
    pub prompt: prompt::Model,
    pub trending_score: f64,
}

/// Score and order prompts, most trending first.
///
/// The sort is stable: exact ties keep their input order. One bad record
/// fails the whole ranking.
pub fn rank(prompts: Vec<prompt::Model>, now: DateTime<Utc>) -> AppResult<Vec<RankedPrompt>> {
    let mut ranked = prompts
        .into_iter()
        .map(|prompt| {
            let trending_score = trending_score(
                prompt.upvotes,
                prompt.downvotes,
                prompt.created_at.with_timezone(&Utc),
                now,
            )
            .map_err(|e| {
                error!(prompt_id = %prompt.id, error = %e, "Malformed prompt in trending ranking");
                e
            })?;
            Ok(RankedPrompt {
                prompt,
                trending_score,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    ranked.sort_by(|a, b| b.trending_score.total_cmp(&a.trending_score));
    Ok(ranked)
}

/// Trending service for business logic.
#[derive(Clone)]
pub struct TrendingService {
    prompt_repo: PromptRepository,
    max_candidates: u64,
}

impl TrendingService {
    /// Create a new trending service.
    #[must_use]
    pub const fn new(prompt_repo: PromptRepository) -> Self {
        Self {
            prompt_repo,
            max_candidates: 10_000,
        }
    }

    /// Bound the number of prompts ranked per request.
    #[must_use]
    pub const fn with_max_candidates(mut self, max_candidates: u64) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Rank public prompts, optionally only those tagged `tag`, and return
    /// one page of the ranking.
    pub async fn trending(
        &self,
        tag: Option<&str>,
        window: PageWindow,
    ) -> AppResult<Page<RankedPrompt>> {
        let filter = visibility::trending_filter(tag);
        let candidates = self
            .prompt_repo
            .find_filtered(&filter, 0, self.max_candidates)
            .await?;

        if candidates.len() as u64 >= self.max_candidates {
            warn!(
                max_candidates = self.max_candidates,
                tag = ?filter.tag,
                "Trending candidate set truncated; older prompts are not ranked"
            );
        }

        let ranked = rank(candidates, Utc::now()).map_err(|e| {
            error!(error = %e, "Trending ranking failed");
            e
        })?;

        window.slice(ranked)
    }
}
