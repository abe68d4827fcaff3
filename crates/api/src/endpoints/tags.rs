//! Tag endpoints.

use axum::{Json, Router, extract::State, routing::get};
use promptvault_common::AppResult;

use crate::{middleware::AppState, response::TagResponse};

/// List all tags.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<TagResponse>>> {
    let tags = state.tag_service.list().await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}
