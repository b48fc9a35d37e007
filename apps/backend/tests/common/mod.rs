//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the router against a real or lazy database
//! - Helpers for seeding subjects, flashcards and quizzes
//!
//! # Requirements
//! Tests marked `#[ignore = "requires database"]` need PostgreSQL (set
//! DATABASE_URL) and reset the tables, so run them serially:
//! `cargo test -- --ignored --test-threads=1`

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use flashcards_backend::db::Database;
use flashcards_backend::models::{Flashcard, NewFlashcard, NewQuiz, Quiz, Subject};
use flashcards_backend::{router, AppState};

/// Address that is never connected to by tests which fail before store access.
const UNUSED_DATABASE_URL: &str = "postgres://postgres@127.0.0.1:1/unused";

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a context against DATABASE_URL with empty tables.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        sqlx::query("TRUNCATE subjects, flashcards, quizzes RESTART IDENTITY CASCADE")
            .execute(db.pool())
            .await
            .expect("Failed to reset tables");

        Self::with_database(db)
    }

    /// Create a context whose pool never connects.
    ///
    /// Use this for requests that are rejected before any store access; a
    /// request that does reach the store fails with a 500.
    pub async fn without_database() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy(UNUSED_DATABASE_URL)
            .expect("Failed to build lazy pool");

        Self::with_database(Database::from_pool(pool))
    }

    fn with_database(db: Database) -> Self {
        let db = Arc::new(db);
        let app = router(AppState { db: db.clone() });
        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub async fn create_subject(&self, name: &str) -> Subject {
        self.db
            .create_subject(name, 0)
            .await
            .expect("Failed to create subject")
    }

    pub async fn create_flashcard(&self, subject_id: i64, front: &str, order: f64) -> Flashcard {
        self.db
            .create_flashcard(&NewFlashcard {
                front: front.to_string(),
                back: format!("{} (back)", front),
                subject_id,
                order,
            })
            .await
            .expect("Failed to create flashcard")
    }

    /// Create `n` cards with orders 1.0, 2.0, ... n.
    pub async fn create_flashcards(&self, subject_id: i64, n: usize) -> Vec<Flashcard> {
        let mut cards = Vec::with_capacity(n);
        for i in 1..=n {
            cards.push(
                self.create_flashcard(subject_id, &format!("Card {}", i), i as f64)
                    .await,
            );
        }
        cards
    }

    pub async fn create_quiz(&self, subject_id: i64, solution: i32, points: i32) -> Quiz {
        self.db
            .create_quiz(&NewQuiz {
                question: "Which one?".to_string(),
                answers: [
                    "first".to_string(),
                    "second".to_string(),
                    "third".to_string(),
                    "fourth".to_string(),
                ],
                solution,
                subject_id,
                points,
            })
            .await
            .expect("Failed to create quiz")
    }

    pub async fn subject_points(&self, subject_id: i64) -> i64 {
        self.db
            .get_subject(subject_id)
            .await
            .expect("Failed to load subject")
            .expect("Subject missing")
            .points
    }

    pub async fn flashcard_count(&self) -> usize {
        self.db
            .list_flashcards()
            .await
            .expect("Failed to list flashcards")
            .len()
    }
}
