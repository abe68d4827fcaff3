//! Error types for promptvault-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    /// The prompt does not exist, or is not visible for the requested action.
    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    /// A vote in the same direction is already recorded.
    #[error("Already {0}")]
    AlreadyVoted(String),

    /// Remove-vote was requested but no vote is recorded.
    #[error("No vote to remove")]
    NoVoteToRemove,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    /// Transient store failure (constraint race, lost connection). Safe to retry.
    #[error("Temporarily unavailable: {0}")]
    Retryable(String),

    /// A commit failed in a way that leaves its outcome unknown; the write
    /// may or may not have been applied. Not retried automatically.
    #[error("Outcome unknown, check state before retrying: {0}")]
    CommitUncertain(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::PromptNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyVoted(_) | Self::NoVoteToRemove | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Retryable(_) | Self::CommitUncertain(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::PromptNotFound(_) => "PROMPT_NOT_FOUND",
            Self::AlreadyVoted(_) => "ALREADY_VOTED",
            Self::NoVoteToRemove => "NO_VOTE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Retryable(_) => "RETRYABLE",
            Self::CommitUncertain(_) => "COMMIT_UNCERTAIN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Returns whether the failed operation may succeed if attempted again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_conflicts_map_to_409() {
        assert_eq!(
            AppError::AlreadyVoted("upvoted".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::NoVoteToRemove.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::NoVoteToRemove.error_code(), "NO_VOTE");
    }

    #[test]
    fn test_already_voted_message() {
        let err = AppError::AlreadyVoted("downvoted".to_string());
        assert_eq!(err.to_string(), "Already downvoted");
        assert_eq!(err.error_code(), "ALREADY_VOTED");
    }

    #[test]
    fn test_prompt_not_found_is_404() {
        let err = AppError::PromptNotFound("p1".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_retryable_is_server_error() {
        let err = AppError::Retryable("connection reset".to_string());
        assert!(err.is_retryable());
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!AppError::Database("boom".to_string()).is_retryable());
    }

    #[test]
    fn test_commit_uncertain_is_503_but_not_retryable() {
        let err = AppError::CommitUncertain("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "COMMIT_UNCERTAIN");
        assert!(!err.is_retryable());
    }
}
