//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use promptvault_common::Config;
use promptvault_core::{
    PaginationPolicy, PromptService, PromptViewService, TagService, TrendingService, UserService,
    VoteService,
};
use promptvault_db::repositories::{
    PromptRepository, TagRepository, UserRepository, VoteRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub prompt_service: PromptService,
    pub prompt_view_service: PromptViewService,
    pub tag_service: TagService,
    pub trending_service: TrendingService,
    pub vote_service: VoteService,
    pub pagination: PaginationPolicy,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let prompt_repo = PromptRepository::new(Arc::clone(&db));
        let tag_repo = TagRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone()),
            prompt_service: PromptService::new(prompt_repo.clone(), tag_repo.clone()),
            prompt_view_service: PromptViewService::new(
                user_repo,
                tag_repo.clone(),
                vote_repo.clone(),
            ),
            tag_service: TagService::new(tag_repo),
            trending_service: TrendingService::new(prompt_repo.clone())
                .with_max_candidates(config.trending.max_candidates),
            vote_service: VoteService::new(prompt_repo, vote_repo)
                .with_max_retries(config.voting.max_retries),
            pagination: config.pagination.into(),
        }
    }
}

/// Authentication middleware.
///
/// Resolves a `Authorization: Bearer <token>` header to a user and stores it
/// in the request extensions. Unknown tokens leave the request anonymous;
/// handlers that need a user reject it through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
