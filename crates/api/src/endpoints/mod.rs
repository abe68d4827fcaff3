//! API endpoints.

mod prompts;
mod tags;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(prompts::router())
        .merge(votes::router())
        .nest("/tags", tags::router())
        .nest("/user", users::router())
}
