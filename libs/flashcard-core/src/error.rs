//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating user input against the core rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid rating '{value}', expected one of: understood, so_so, study_more")]
    InvalidRating { value: String },

    #[error("Answer must be an integer, got '{value}'")]
    InvalidAnswer { value: String },

    #[error("Solution must be between 1 and 4, got {value}")]
    InvalidSolution { value: i64 },

    #[error("Subject name must be at most {max} characters, got {len}")]
    SubjectNameTooLong { len: usize, max: usize },
}
