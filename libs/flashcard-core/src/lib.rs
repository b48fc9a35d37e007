//! Core flashcard library used by the backend.
//!
//! Provides:
//! - Rating types and the fractional-rank reorder used after a self-rating
//! - Block scanner for the plain-text flashcard and quiz import format
//! - Multiple-choice answer grading

pub mod algorithm;
pub mod error;
pub mod grading;
pub mod parser;
pub mod types;

pub use algorithm::{Placement, Window};
pub use error::{CoreError, Result};
pub use grading::{grade, validate_solution, AnswerInput, Grade};
pub use parser::{parse_flashcards, parse_quizzes};
pub use types::{
    check_subject_name, ImportKind, ParseReport, Rating, RawFlashcard, RawQuiz, DEFAULT_SUBJECT,
    MAX_SUBJECT_NAME_LEN,
};
