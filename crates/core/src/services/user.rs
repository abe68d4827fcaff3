//! User service.

use promptvault_common::{AppError, AppResult};
use promptvault_db::{entities::user, repositories::UserRepository};

/// Name shown for a user: the username, or the local part of the email when
/// the username is blank.
#[must_use]
pub fn display_name(user: &user::Model) -> String {
    if !user.username.trim().is_empty() {
        return user.username.clone();
    }

    user.email
        .as_deref()
        .and_then(|email| email.split('@').next())
        .filter(|local| !local.is_empty())
        .map_or_else(|| user.id.clone(), str::to_string)
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
