//! Core types for flashcard application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Subject used when an import does not name one.
pub const DEFAULT_SUBJECT: &str = "General";

/// Longest subject name the store accepts, in characters.
pub const MAX_SUBJECT_NAME_LEN: usize = 100;

/// Reject subject names longer than [`MAX_SUBJECT_NAME_LEN`] characters.
pub fn check_subject_name(name: &str) -> Result<&str, CoreError> {
    let len = name.chars().count();
    if len > MAX_SUBJECT_NAME_LEN {
        return Err(CoreError::SubjectNameTooLong {
            len,
            max: MAX_SUBJECT_NAME_LEN,
        });
    }
    Ok(name)
}

/// Self-rated recall for a flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Understood,
    SoSo,
    StudyMore,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Self::Understood, Self::SoSo, Self::StudyMore];

    /// Points added to the card's subject.
    pub fn reward(self) -> i32 {
        match self {
            Self::Understood => 10,
            Self::SoSo => 3,
            Self::StudyMore => 1,
        }
    }

    /// Position the card re-enters at among `count` other cards.
    pub fn target_index(self, count: usize) -> usize {
        match self {
            Self::StudyMore => count.min(10),
            Self::SoSo => count.min(25),
            Self::Understood => ((count as f64 * 0.9).floor() as usize).min(count),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Understood => "understood",
            Self::SoSo => "so_so",
            Self::StudyMore => "study_more",
        }
    }
}

impl FromStr for Rating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "understood" => Ok(Self::Understood),
            "so_so" => Ok(Self::SoSo),
            "study_more" => Ok(Self::StudyMore),
            other => Err(CoreError::InvalidRating {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an uploaded file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Flashcard,
    Quiz,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flashcard => "flashcard",
            Self::Quiz => "quiz",
        }
    }
}

/// Flashcard block parsed from an import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlashcard {
    pub front: String,
    pub back: String,
    pub line_number: usize,
}

/// Quiz block parsed from an import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuiz {
    pub question: String,
    pub answers: [String; 4],
    /// 1-based index into `answers`.
    pub solution: i32,
    pub points: i32,
    pub line_number: usize,
}

/// Outcome of scanning an import file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    /// Lines where a block started but did not match the format.
    pub skipped_lines: Vec<usize>,
}

impl<T> ParseReport<T> {
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }
}

impl<T> Default for ParseReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped_lines: Vec::new(),
        }
    }
}
