//! Subject endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use flashcard_core::check_subject_name;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::Id;
use crate::AppState;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Subject {} not found", id))
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput("Subject name must not be blank".to_string()));
    }
    Ok(check_subject_name(name)?)
}

/// GET /api/subjects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Subject>>> {
    let subjects = state.db.list_subjects().await?;
    Ok(Json(subjects))
}

/// GET /api/subjects/:id
pub async fn retrieve(State(state): State<AppState>, Id(id): Id) -> Result<Json<Subject>> {
    let subject = state.db.get_subject(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(subject))
}

/// POST /api/subjects
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateSubjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Subject>)> {
    let Json(payload) = payload?;
    let name = validate_name(&payload.name)?;

    let subject = state
        .db
        .create_subject(name, payload.points.unwrap_or(0))
        .await?;

    tracing::info!("Created subject {} '{}'", subject.id, subject.name);

    Ok((StatusCode::CREATED, Json(subject)))
}

/// PUT/PATCH /api/subjects/:id
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    payload: std::result::Result<Json<UpdateSubjectRequest>, JsonRejection>,
) -> Result<Json<Subject>> {
    let Json(payload) = payload?;
    let name = payload.name.as_deref().map(validate_name).transpose()?;

    let subject = state
        .db
        .update_subject(id, name, payload.points)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(subject))
}

/// DELETE /api/subjects/:id
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode> {
    if !state.db.delete_subject(id).await? {
        return Err(not_found(id));
    }

    tracing::info!("Deleted subject {}", id);

    Ok(StatusCode::NO_CONTENT)
}
