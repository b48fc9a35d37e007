//! Quiz endpoints

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use flashcard_core::{grade, validate_solution};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::Id;
use crate::services::import::{self, Upload};
use crate::services::selection::random_offset;
use crate::AppState;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Quiz {} not found", id))
}

fn validate_points(points: Option<i32>) -> Result<Option<i32>> {
    match points {
        Some(p) if p < 0 => Err(ApiError::InvalidInput(format!(
            "Points must not be negative, got {}",
            p
        ))),
        other => Ok(other),
    }
}

/// GET /api/quizzes
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Quiz>>> {
    let quizzes = state.db.list_quizzes().await?;
    Ok(Json(quizzes))
}

/// GET /api/quizzes/:id
pub async fn retrieve(State(state): State<AppState>, Id(id): Id) -> Result<Json<Quiz>> {
    let quiz = state.db.get_quiz(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(quiz))
}

/// POST /api/quizzes
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Quiz>)> {
    let Json(payload) = payload?;

    let quiz = NewQuiz {
        question: payload.question,
        answers: [
            payload.answer1,
            payload.answer2,
            payload.answer3,
            payload.answer4,
        ],
        solution: validate_solution(payload.solution)?,
        subject_id: payload.subject,
        points: validate_points(payload.points)?.unwrap_or(1),
    };

    let quiz = state.db.create_quiz(&quiz).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// PUT/PATCH /api/quizzes/:id
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    payload: std::result::Result<Json<UpdateQuizRequest>, JsonRejection>,
) -> Result<Json<Quiz>> {
    let Json(payload) = payload?;

    let changes = QuizChanges {
        question: payload.question,
        answers: [
            payload.answer1,
            payload.answer2,
            payload.answer3,
            payload.answer4,
        ],
        solution: payload.solution.map(validate_solution).transpose()?,
        subject_id: payload.subject,
        points: validate_points(payload.points)?,
    };

    let quiz = state
        .db
        .update_quiz(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(quiz))
}

/// DELETE /api/quizzes/:id
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode> {
    if !state.db.delete_quiz(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/quizzes/random
pub async fn random(State(state): State<AppState>) -> Result<Json<Quiz>> {
    let count = state.db.count_quizzes().await?;
    let no_quizzes = || ApiError::NotFound("No quizzes available".to_string());

    let offset = random_offset(count, &mut rand::rng()).ok_or_else(no_quizzes)?;
    let quiz = state
        .db
        .quiz_at_offset(offset)
        .await?
        .ok_or_else(no_quizzes)?;

    Ok(Json(quiz))
}

/// POST /api/quizzes/:id/submit_answer
pub async fn submit_answer(
    State(state): State<AppState>,
    Id(id): Id,
    payload: std::result::Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<Json<SubmitAnswerResponse>> {
    let Json(payload) = payload?;

    let choice = payload
        .answer
        .ok_or_else(|| ApiError::InvalidInput("Missing answer".to_string()))?
        .to_choice()?;

    let quiz = state.db.get_quiz(id).await?.ok_or_else(|| not_found(id))?;
    let result = grade(quiz.solution, quiz.points, choice);

    let subject = if result.correct {
        state.db.add_subject_points(quiz.subject, result.reward).await?
    } else {
        state.db.get_subject(quiz.subject).await?
    };
    let subject = subject
        .ok_or_else(|| ApiError::NotFound(format!("Subject {} not found", quiz.subject)))?;

    tracing::info!(
        "Answer {} to quiz {} was {}, subject '{}' has {} points",
        choice,
        id,
        if result.correct { "correct" } else { "wrong" },
        subject.name,
        subject.points
    );

    Ok(Json(SubmitAnswerResponse {
        correct: result.correct,
        solution: quiz.solution,
        subject_points: subject.points,
    }))
}

/// POST /api/quizzes/upload
/// Multipart with a `file` of `Q: ... S: n [P: n]` blocks and an optional `subject`
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let upload = match multipart {
        Ok(mut multipart) => import::read_upload(&mut multipart).await?,
        Err(_) => Upload::default(),
    };

    let response = import::import(&state.db, &upload, ImportKind::Quiz).await?;
    Ok(Json(response))
}
