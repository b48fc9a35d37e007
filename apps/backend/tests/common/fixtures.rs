//! Test fixtures and factory functions for creating test data.

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};
use uuid::Uuid;

/// A subject name no other test uses.
pub fn unique_subject_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Generate flashcard import text with `num_cards` well-formed blocks.
pub fn sample_flashcard_file(num_cards: usize) -> String {
    (1..=num_cards)
        .map(|i| format!("F: \"Front {}\"\nB: \"Back {}\"\n", i, i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate quiz import text; every block's solution is 2 and odd blocks carry `P: 5`.
pub fn sample_quiz_file(num_quizzes: usize) -> String {
    (1..=num_quizzes)
        .map(|i| {
            let points = if i % 2 == 1 { "P: 5\n" } else { "" };
            format!(
                "Q: \"Question {i}?\"\nA1: \"one\"\nA2: \"two\"\nA3: \"three\"\nA4: \"four\"\nS: 2\n{points}"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multipart body with a text file and an optional subject.
pub fn upload_form(content: &str, subject: Option<&str>) -> MultipartForm {
    let file = Part::bytes(content.as_bytes().to_vec())
        .file_name("import.txt")
        .mime_type("text/plain");

    let form = MultipartForm::new().add_part("file", file);
    match subject {
        Some(subject) => form.add_text("subject", subject.to_string()),
        None => form,
    }
}

/// Multipart body with only a subject field.
pub fn form_without_file(subject: &str) -> MultipartForm {
    MultipartForm::new().add_text("subject", subject.to_string())
}

pub fn flashcard_body(subject_id: i64, front: &str) -> Value {
    json!({
        "front": front,
        "back": format!("{} (back)", front),
        "subject": subject_id,
    })
}

pub fn quiz_body(subject_id: i64, solution: i64) -> Value {
    json!({
        "question": "What is 2 + 2?",
        "answer1": "3",
        "answer2": "4",
        "answer3": "5",
        "answer4": "22",
        "solution": solution,
        "subject": subject_id,
    })
}
