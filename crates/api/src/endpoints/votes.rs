//! Vote endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use promptvault_common::AppResult;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{RemoveVoteResponse, VoteResponse},
};

/// Upvote a public prompt.
async fn upvote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VoteResponse>> {
    let outcome = state.vote_service.upvote(&user.id, &id).await?;
    Ok(Json(outcome.into()))
}

/// Downvote a public prompt.
async fn downvote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VoteResponse>> {
    let outcome = state.vote_service.downvote(&user.id, &id).await?;
    Ok(Json(outcome.into()))
}

/// Withdraw the caller's vote.
async fn remove_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RemoveVoteResponse>> {
    let outcome = state.vote_service.remove_vote(&user.id, &id).await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts/{id}/upvote", post(upvote))
        .route("/prompts/{id}/downvote", post(downvote))
        .route("/prompts/{id}/remove_vote", post(remove_vote))
}
