use axum::http::StatusCode;
use thiserror::Error;

use crate::llm::LlmError;

/// Failures of the question-to-rows pipeline.
///
/// Every variant maps to exactly one HTTP status; see [`QueryError::status_code`].
#[derive(Error, Debug)]
pub enum QueryError {
    /// The database could not be opened or does not exist
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    /// Any other driver-level failure while reading metadata
    #[error("Database error: {0}")]
    Database(String),

    /// The completion service failed or returned something unusable
    #[error("{0}")]
    TranslationService(#[from] LlmError),

    /// Sanitization left nothing to execute
    #[error("No SQL query generated.")]
    EmptyTranslation,

    /// The generated statement failed; carries the driver message verbatim
    #[error("{0}")]
    QueryExecution(String),

    /// A required request field is missing or malformed
    #[error("{0}")]
    Validation(String),
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::Validation(_) | QueryError::EmptyTranslation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<r2d2::Error> for QueryError {
    fn from(err: r2d2::Error) -> Self {
        QueryError::DatabaseConnection(err.to_string())
    }
}

impl From<tokio::task::JoinError> for QueryError {
    fn from(err: tokio::task::JoinError) -> Self {
        QueryError::Database(format!("Database task execution failed: {}", err))
    }
}
