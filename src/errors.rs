//! Error types for the gotweet service.
//!
//! Every fallible operation in the library returns [`AppError`]. The HTTP layer
//! turns an error into a status code with [`AppError::status_code`]; nothing on a
//! request path aborts the process.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by publishing, searching, logging and credential loading.
#[derive(Error, Debug)]
pub enum AppError {
    /// User input or the decorated message violates a platform length boundary.
    #[error("string length over: {chars} characters (limit {limit})")]
    Length { chars: usize, limit: usize },

    /// The posting API rejected the request or could not be reached.
    #[error("failed to publish message: {0}")]
    Publish(String),

    /// The database could not be reached or a query failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The search API rejected the request or returned an unreadable body.
    #[error("search failed: {0}")]
    Search(String),

    /// The credentials file is missing or malformed.
    #[error("invalid credentials: {0}")]
    Credential(String),

    /// An environment setting could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// Maps the error onto the HTTP status returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Length { .. } => StatusCode::BAD_REQUEST,
            AppError::Publish(_) | AppError::Search(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Credential(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let length = AppError::Length {
            chars: 121,
            limit: 120,
        };
        assert_eq!(length.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Publish("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Storage("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_length_message() {
        let e = AppError::Length {
            chars: 140,
            limit: 140,
        };
        assert!(e.to_string().starts_with("string length over"));
    }
}
