//! User endpoints.

use axum::{Json, Router, routing::get};
use promptvault_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::UserResponse};

/// Get the authenticated user.
async fn me(AuthUser(user): AuthUser) -> AppResult<Json<UserResponse>> {
    Ok(Json(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
