//! Multiple-choice answer grading.

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Number of answer choices on a quiz.
pub const CHOICES: i64 = 4;

/// Submitted answer as it arrives in a request body.
///
/// Clients send the 1-based choice either as a number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnswerInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AnswerInput {
    /// Coerce to an integer choice.
    pub fn to_choice(&self) -> Result<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
            Self::Float(f) => Err(CoreError::InvalidAnswer {
                value: f.to_string(),
            }),
            Self::Text(s) => s.trim().parse::<i64>().map_err(|_| CoreError::InvalidAnswer {
                value: s.clone(),
            }),
        }
    }
}

/// Result of checking one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct: bool,
    /// Points to add to the subject.
    pub reward: i32,
}

/// Check `choice` against the stored `solution`.
pub fn grade(solution: i32, points: i32, choice: i64) -> Grade {
    let correct = i64::from(solution) == choice;
    Grade {
        correct,
        reward: if correct { points } else { 0 },
    }
}

/// Ensure a solution index points at one of the four answers.
pub fn validate_solution(solution: i64) -> Result<i32> {
    if (1..=CHOICES).contains(&solution) {
        Ok(solution as i32)
    } else {
        Err(CoreError::InvalidSolution { value: solution })
    }
}
