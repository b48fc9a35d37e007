pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Subject routes
        .route(
            "/api/subjects",
            get(routes::subjects::list).post(routes::subjects::create),
        )
        .route(
            "/api/subjects/:id",
            get(routes::subjects::retrieve)
                .put(routes::subjects::update)
                .patch(routes::subjects::update)
                .delete(routes::subjects::delete),
        )
        // Flashcard routes
        .route(
            "/api/flashcards",
            get(routes::flashcards::list).post(routes::flashcards::create),
        )
        .route("/api/flashcards/upload", post(routes::flashcards::upload))
        .route(
            "/api/flashcards/:id",
            get(routes::flashcards::retrieve)
                .put(routes::flashcards::update)
                .patch(routes::flashcards::update)
                .delete(routes::flashcards::delete),
        )
        .route("/api/flashcards/:id/rate", post(routes::flashcards::rate))
        // Quiz routes
        .route(
            "/api/quizzes",
            get(routes::quizzes::list).post(routes::quizzes::create),
        )
        .route("/api/quizzes/random", get(routes::quizzes::random))
        .route("/api/quizzes/upload", post(routes::quizzes::upload))
        .route(
            "/api/quizzes/:id",
            get(routes::quizzes::retrieve)
                .put(routes::quizzes::update)
                .patch(routes::quizzes::update)
                .delete(routes::quizzes::delete),
        )
        .route(
            "/api/quizzes/:id/submit_answer",
            post(routes::quizzes::submit_answer),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState { db: Arc::new(db) };
    let app = router(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
