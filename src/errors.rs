use thiserror::Error;

use crate::tmdb::TmdbError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement From traits for common error types to simplify conversion

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization error: {}", e))
    }
}

impl From<TmdbError> for AppError {
    fn from(e: TmdbError) -> Self {
        match e {
            TmdbError::NotFound(what) => AppError::NotFound(what),
            err @ TmdbError::Unauthorized => AppError::Auth(err.to_string()),
            err @ TmdbError::MissingToken => AppError::Config(err.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}
