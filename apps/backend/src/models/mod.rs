//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from flashcard-core
pub use flashcard_core::{AnswerInput, ImportKind, Rating, RawFlashcard, RawQuiz};

// === Database Entity Types ===

/// Subject with its accumulated score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub points: i64,
}

/// Flashcard joined with its subject name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub subject: i64,
    pub subject_name: String,
    pub order: f64,
    pub last_seen: DateTime<Utc>,
}

/// Quiz joined with its subject name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub question: String,
    pub answer1: String,
    pub answer2: String,
    pub answer3: String,
    pub answer4: String,
    pub solution: i32,
    pub subject: i64,
    pub subject_name: String,
    pub points: i32,
}

/// Flashcard ready to insert
#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    pub subject_id: i64,
    pub order: f64,
}

impl NewFlashcard {
    pub fn from_raw(raw: RawFlashcard, subject_id: i64, order: f64) -> Self {
        Self {
            front: raw.front,
            back: raw.back,
            subject_id,
            order,
        }
    }
}

/// Quiz ready to insert
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub question: String,
    pub answers: [String; 4],
    pub solution: i32,
    pub subject_id: i64,
    pub points: i32,
}

impl NewQuiz {
    pub fn from_raw(raw: RawQuiz, subject_id: i64) -> Self {
        Self {
            question: raw.question,
            answers: raw.answers,
            solution: raw.solution,
            subject_id,
            points: raw.points,
        }
    }
}

/// Column changes for a flashcard update, `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct FlashcardChanges {
    pub front: Option<String>,
    pub back: Option<String>,
    pub subject_id: Option<i64>,
    pub order: Option<f64>,
}

/// Column changes for a quiz update, `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct QuizChanges {
    pub question: Option<String>,
    pub answers: [Option<String>; 4],
    pub solution: Option<i32>,
    pub subject_id: Option<i64>,
    pub points: Option<i32>,
}

// === API Request/Response Types ===

// Subject types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub points: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub points: Option<i64>,
}

// Flashcard types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFlashcardRequest {
    pub front: String,
    pub back: String,
    pub subject: i64,
    pub order: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub subject: Option<i64>,
    pub order: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateRequest {
    pub rating: Option<String>,
}

// Quiz types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    pub question: String,
    pub answer1: String,
    pub answer2: String,
    pub answer3: String,
    pub answer4: String,
    pub solution: i64,
    pub subject: i64,
    pub points: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuizRequest {
    pub question: Option<String>,
    pub answer1: Option<String>,
    pub answer2: Option<String>,
    pub answer3: Option<String>,
    pub answer4: Option<String>,
    pub solution: Option<i64>,
    pub subject: Option<i64>,
    pub points: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: Option<AnswerInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub solution: i32,
    pub subject_points: i64,
}

// Upload types
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub created: usize,
    pub skipped: usize,
}

impl UploadResponse {
    pub fn new(created: usize, skipped: usize) -> Self {
        Self {
            message: format!("Successfully uploaded {} items", created),
            created,
            skipped,
        }
    }
}
