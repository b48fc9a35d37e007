//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// SQLSTATE raised when arithmetic leaves the column's range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Map a constraint or range violation caused by client input to InvalidInput
fn input_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> ApiError {
    let violated = err.as_database_error().is_some_and(|db_err| {
        db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation()
            || db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE)
    });

    if violated {
        ApiError::InvalidInput(message())
    } else {
        ApiError::Database(err)
    }
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Subject Repository ===

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, points
            FROM subjects
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    pub async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, points
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn create_subject(&self, name: &str, points: i64) -> Result<Subject> {
        sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, points)
            VALUES ($1, $2)
            RETURNING id, name, points
            "#,
        )
        .bind(name)
        .bind(points)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| input_violation(e, || format!("Subject '{}' already exists", name)))
    }

    pub async fn update_subject(
        &self,
        id: i64,
        name: Option<&str>,
        points: Option<i64>,
    ) -> Result<Option<Subject>> {
        sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = COALESCE($2, name),
                points = COALESCE($3, points)
            WHERE id = $1
            RETURNING id, name, points
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(points)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            input_violation(e, || {
                format!("Subject '{}' already exists", name.unwrap_or_default())
            })
        })
    }

    /// Delete a subject and, by cascade, its flashcards and quizzes
    pub async fn delete_subject(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a subject by exact name, creating it if absent
    pub async fn upsert_subject_by_name(&self, name: &str) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, points
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    /// Atomically add points to a subject
    pub async fn add_subject_points(&self, id: i64, points: i32) -> Result<Option<Subject>> {
        sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET points = points + $2
            WHERE id = $1
            RETURNING id, name, points
            "#,
        )
        .bind(id)
        .bind(i64::from(points))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| input_violation(e, || format!("Points for subject {} would overflow", id)))
    }

    // === Flashcard Repository ===

    /// All flashcards in study order
    pub async fn list_flashcards(&self) -> Result<Vec<Flashcard>> {
        let cards = sqlx::query_as::<_, Flashcard>(
            r#"
            SELECT f.id, f.front, f.back, f.subject_id AS subject, s.name AS subject_name,
                   f."order", f.last_seen
            FROM flashcards f
            JOIN subjects s ON s.id = f.subject_id
            ORDER BY f."order", f.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    pub async fn get_flashcard(&self, id: i64) -> Result<Option<Flashcard>> {
        let card = sqlx::query_as::<_, Flashcard>(
            r#"
            SELECT f.id, f.front, f.back, f.subject_id AS subject, s.name AS subject_name,
                   f."order", f.last_seen
            FROM flashcards f
            JOIN subjects s ON s.id = f.subject_id
            WHERE f.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    pub async fn create_flashcard(&self, card: &NewFlashcard) -> Result<Flashcard> {
        sqlx::query_as::<_, Flashcard>(
            r#"
            WITH f AS (
                INSERT INTO flashcards (front, back, subject_id, "order")
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT f.id, f.front, f.back, f.subject_id AS subject, s.name AS subject_name,
                   f."order", f.last_seen
            FROM f
            JOIN subjects s ON s.id = f.subject_id
            "#,
        )
        .bind(&card.front)
        .bind(&card.back)
        .bind(card.subject_id)
        .bind(card.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| input_violation(e, || format!("Subject {} does not exist", card.subject_id)))
    }

    /// Apply changes and refresh last_seen
    pub async fn update_flashcard(
        &self,
        id: i64,
        changes: &FlashcardChanges,
    ) -> Result<Option<Flashcard>> {
        sqlx::query_as::<_, Flashcard>(
            r#"
            WITH f AS (
                UPDATE flashcards
                SET front = COALESCE($2, front),
                    back = COALESCE($3, back),
                    subject_id = COALESCE($4, subject_id),
                    "order" = COALESCE($5, "order"),
                    last_seen = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT f.id, f.front, f.back, f.subject_id AS subject, s.name AS subject_name,
                   f."order", f.last_seen
            FROM f
            JOIN subjects s ON s.id = f.subject_id
            "#,
        )
        .bind(id)
        .bind(&changes.front)
        .bind(&changes.back)
        .bind(changes.subject_id)
        .bind(changes.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            input_violation(e, || {
                format!("Subject {} does not exist", changes.subject_id.unwrap_or_default())
            })
        })
    }

    pub async fn delete_flashcard(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM flashcards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of flashcards other than `exclude_id`
    pub async fn count_other_flashcards(&self, exclude_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flashcards WHERE id != $1")
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Orders of a slice of the study sequence, excluding `exclude_id`
    pub async fn flashcard_order_window(
        &self,
        exclude_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<f64>> {
        let orders: Vec<f64> = sqlx::query_scalar(
            r#"
            SELECT "order"
            FROM flashcards
            WHERE id != $1
            ORDER BY "order", id
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(exclude_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Highest order in the study sequence, 0.0 when there are no cards
    pub async fn max_flashcard_order(&self) -> Result<f64> {
        let max: f64 = sqlx::query_scalar(r#"SELECT COALESCE(MAX("order"), 0.0) FROM flashcards"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(max)
    }

    /// Overwrite a card's order and refresh last_seen
    pub async fn set_flashcard_order(&self, id: i64, order: f64) -> Result<Option<Flashcard>> {
        let changes = FlashcardChanges {
            order: Some(order),
            ..Default::default()
        };
        self.update_flashcard(id, &changes).await
    }

    // === Quiz Repository ===

    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT q.id, q.question, q.answer1, q.answer2, q.answer3, q.answer4, q.solution,
                   q.subject_id AS subject, s.name AS subject_name, q.points
            FROM quizzes q
            JOIN subjects s ON s.id = q.subject_id
            ORDER BY q.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT q.id, q.question, q.answer1, q.answer2, q.answer3, q.answer4, q.solution,
                   q.subject_id AS subject, s.name AS subject_name, q.points
            FROM quizzes q
            JOIN subjects s ON s.id = q.subject_id
            WHERE q.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn create_quiz(&self, quiz: &NewQuiz) -> Result<Quiz> {
        let [answer1, answer2, answer3, answer4] = &quiz.answers;
        sqlx::query_as::<_, Quiz>(
            r#"
            WITH q AS (
                INSERT INTO quizzes (question, answer1, answer2, answer3, answer4,
                                     solution, subject_id, points)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT q.id, q.question, q.answer1, q.answer2, q.answer3, q.answer4, q.solution,
                   q.subject_id AS subject, s.name AS subject_name, q.points
            FROM q
            JOIN subjects s ON s.id = q.subject_id
            "#,
        )
        .bind(&quiz.question)
        .bind(answer1)
        .bind(answer2)
        .bind(answer3)
        .bind(answer4)
        .bind(quiz.solution)
        .bind(quiz.subject_id)
        .bind(quiz.points)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| input_violation(e, || format!("Subject {} does not exist", quiz.subject_id)))
    }

    pub async fn update_quiz(&self, id: i64, changes: &QuizChanges) -> Result<Option<Quiz>> {
        let [answer1, answer2, answer3, answer4] = &changes.answers;
        sqlx::query_as::<_, Quiz>(
            r#"
            WITH q AS (
                UPDATE quizzes
                SET question = COALESCE($2, question),
                    answer1 = COALESCE($3, answer1),
                    answer2 = COALESCE($4, answer2),
                    answer3 = COALESCE($5, answer3),
                    answer4 = COALESCE($6, answer4),
                    solution = COALESCE($7, solution),
                    subject_id = COALESCE($8, subject_id),
                    points = COALESCE($9, points)
                WHERE id = $1
                RETURNING *
            )
            SELECT q.id, q.question, q.answer1, q.answer2, q.answer3, q.answer4, q.solution,
                   q.subject_id AS subject, s.name AS subject_name, q.points
            FROM q
            JOIN subjects s ON s.id = q.subject_id
            "#,
        )
        .bind(id)
        .bind(&changes.question)
        .bind(answer1)
        .bind(answer2)
        .bind(answer3)
        .bind(answer4)
        .bind(changes.solution)
        .bind(changes.subject_id)
        .bind(changes.points)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            input_violation(e, || {
                format!("Subject {} does not exist", changes.subject_id.unwrap_or_default())
            })
        })
    }

    pub async fn delete_quiz(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_quizzes(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Quiz at a 0-based position in id order
    pub async fn quiz_at_offset(&self, offset: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT q.id, q.question, q.answer1, q.answer2, q.answer3, q.answer4, q.solution,
                   q.subject_id AS subject, s.name AS subject_name, q.points
            FROM quizzes q
            JOIN subjects s ON s.id = q.subject_id
            ORDER BY q.id
            OFFSET $1
            LIMIT 1
            "#,
        )
        .bind(offset)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }
}
