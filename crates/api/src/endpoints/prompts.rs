//! Prompt endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use promptvault_common::AppResult;
use promptvault_core::{CreatePromptInput, PageRequest, UpdatePromptInput};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{PaginatedResponse, PromptResponse},
};

// ==================== Request Types ====================

/// Owner-scoped listing query.
#[derive(Debug, Deserialize)]
pub struct ListPromptsQuery {
    pub is_public: Option<bool>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Trending query.
#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub tag: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

// ==================== Handlers ====================

/// List prompts visible to the caller.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListPromptsQuery>,
) -> AppResult<Json<PaginatedResponse<PromptResponse>>> {
    let window = state.pagination.resolve(PageRequest {
        page: query.page,
        page_size: query.page_size,
    })?;

    let page = state
        .prompt_service
        .list(&user, query.is_public, window)
        .await?;
    let page = state
        .prompt_view_service
        .hydrate_page(page, Some(&user))
        .await?;

    Ok(Json(PaginatedResponse::from_page(page, Into::into)))
}

/// Public prompts ranked by trending score.
async fn trending(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> AppResult<Json<PaginatedResponse<PromptResponse>>> {
    let window = state.pagination.resolve(PageRequest {
        page: query.page,
        page_size: query.page_size,
    })?;

    let ranked = state
        .trending_service
        .trending(query.tag.as_deref(), window)
        .await?;
    let page = state
        .prompt_view_service
        .hydrate_page(ranked.map(|r| r.prompt), viewer.as_ref())
        .await?;

    Ok(Json(PaginatedResponse::from_page(page, Into::into)))
}

/// Create a prompt.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePromptInput>,
) -> AppResult<(StatusCode, Json<PromptResponse>)> {
    let prompt = state.prompt_service.create(&user, input).await?;
    let view = state
        .prompt_view_service
        .hydrate_one(prompt, Some(&user))
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Show a prompt.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PromptResponse>> {
    let prompt = state.prompt_service.get(&id, viewer.as_ref()).await?;
    let view = state
        .prompt_view_service
        .hydrate_one(prompt, viewer.as_ref())
        .await?;

    Ok(Json(view.into()))
}

/// Update a prompt (PUT and PATCH share partial-update semantics).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePromptInput>,
) -> AppResult<Json<PromptResponse>> {
    let prompt = state.prompt_service.update(&user, &id, input).await?;
    let view = state
        .prompt_view_service
        .hydrate_one(prompt, Some(&user))
        .await?;

    Ok(Json(view.into()))
}

/// Delete a prompt.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.prompt_service.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy a prompt into the caller's library.
async fn copy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<PromptResponse>)> {
    let prompt = state.prompt_service.copy(&user, &id).await?;
    let view = state
        .prompt_view_service
        .hydrate_one(prompt, Some(&user))
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(list).post(create))
        .route("/prompts/trending", get(trending))
        .route(
            "/prompts/{id}",
            get(show).put(update).patch(update).delete(delete),
        )
        .route("/prompts/{id}/copy", post(copy))
}
