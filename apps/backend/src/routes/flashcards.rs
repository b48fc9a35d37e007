//! Flashcard endpoints

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use flashcard_core::Placement;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::Id;
use crate::services::import::{self, Upload};
use crate::AppState;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Flashcard {} not found", id))
}

fn validate_order(order: Option<f64>) -> Result<Option<f64>> {
    match order {
        Some(o) if !o.is_finite() => Err(ApiError::InvalidInput(
            "Order must be a finite number".to_string(),
        )),
        other => Ok(other),
    }
}

/// GET /api/flashcards
/// Returns cards in study order
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Flashcard>>> {
    let cards = state.db.list_flashcards().await?;
    Ok(Json(cards))
}

/// GET /api/flashcards/:id
pub async fn retrieve(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<Flashcard>> {
    let card = state.db.get_flashcard(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(card))
}

/// POST /api/flashcards
/// Cards created without an order go to the end of the queue
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateFlashcardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Flashcard>)> {
    let Json(payload) = payload?;

    let order = match validate_order(payload.order)? {
        Some(order) => order,
        None => state.db.max_flashcard_order().await? + 1.0,
    };

    let card = state
        .db
        .create_flashcard(&NewFlashcard {
            front: payload.front,
            back: payload.back,
            subject_id: payload.subject,
            order,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT/PATCH /api/flashcards/:id
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    payload: std::result::Result<Json<UpdateFlashcardRequest>, JsonRejection>,
) -> Result<Json<Flashcard>> {
    let Json(payload) = payload?;

    let changes = FlashcardChanges {
        front: payload.front,
        back: payload.back,
        subject_id: payload.subject,
        order: validate_order(payload.order)?,
    };

    let card = state
        .db
        .update_flashcard(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(card))
}

/// DELETE /api/flashcards/:id
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode> {
    if !state.db.delete_flashcard(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/flashcards/:id/rate
/// Rewards the card's subject and moves the card within the study queue
pub async fn rate(
    State(state): State<AppState>,
    Id(id): Id,
    payload: std::result::Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<Flashcard>> {
    let Json(payload) = payload?;

    // Rating is checked before any store access
    let rating: Rating = payload
        .rating
        .as_deref()
        .ok_or_else(|| ApiError::InvalidInput("Missing rating".to_string()))?
        .parse()?;

    let card = state.db.get_flashcard(id).await?.ok_or_else(|| not_found(id))?;

    let subject = state
        .db
        .add_subject_points(card.subject, rating.reward())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {} not found", card.subject)))?;

    let count = state.db.count_other_flashcards(id).await?;
    let placement = Placement::for_rating(rating, count as usize);
    let window = match placement.window() {
        Some(w) => {
            state
                .db
                .flashcard_order_window(id, w.offset as i64, w.limit as i64)
                .await?
        }
        None => Vec::new(),
    };
    let order = placement.order_from(&window);

    let card = state
        .db
        .set_flashcard_order(id, order)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        "Rated flashcard {} as {}: order {} (slot {} of {}), subject '{}' now {} points",
        id,
        rating,
        order,
        placement.index,
        placement.count,
        subject.name,
        subject.points
    );

    Ok(Json(card))
}

/// POST /api/flashcards/upload
/// Multipart with a `file` of `F: "..." B: "..."` blocks and an optional `subject`
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let upload = match multipart {
        Ok(mut multipart) => import::read_upload(&mut multipart).await?,
        Err(_) => Upload::default(),
    };

    let response = import::import(&state.db, &upload, ImportKind::Flashcard).await?;
    Ok(Json(response))
}
