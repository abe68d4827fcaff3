//! HTTP API layer for promptvault-rs.
//!
//! - **Endpoints**: prompts, votes, trending, tags and the current user
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: token lookup and the shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
