pub mod flashcards;
pub mod quizzes;
pub mod subjects;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::ApiError;

/// Numeric `:id` path segment, rejected as a JSON error body when malformed
#[derive(Debug, Clone, Copy)]
pub struct Id(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
