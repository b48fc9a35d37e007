//! Bulk import API tests.
//!
//! Tests marked as ignored require a running PostgreSQL database.
//! Set DATABASE_URL before running them.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures;
use common::TestContext;

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let ctx = TestContext::without_database().await;
    let server = TestServer::new(ctx.router()).unwrap();

    for path in ["/api/flashcards/upload", "/api/quizzes/upload"] {
        let response = server
            .post(path)
            .multipart(fixtures::form_without_file("Rust"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "No file uploaded");
    }
}

#[tokio::test]
async fn test_upload_with_json_body_is_rejected() {
    let ctx = TestContext::without_database().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/flashcards/upload")
        .json(&json!({ "file": "F: \"a\" B: \"b\"" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_rejects_overlong_subject() {
    let ctx = TestContext::without_database().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let subject = "s".repeat(150);

    for (path, content) in [
        ("/api/flashcards/upload", fixtures::sample_flashcard_file(1)),
        ("/api/quizzes/upload", fixtures::sample_quiz_file(1)),
    ] {
        let response = server
            .post(path)
            .multipart(fixtures::upload_form(&content, Some(&subject)))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "Subject name must be at most 100 characters, got 150"
        );
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_flashcard_upload_appends_in_file_order() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let subject = fixtures::unique_subject_name("Rust");

    let response = server
        .post("/api/flashcards/upload")
        .multipart(fixtures::upload_form(
            &fixtures::sample_flashcard_file(3),
            Some(&subject),
        ))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Successfully uploaded 3 items");
    assert_eq!(body["created"], 3);
    assert_eq!(body["skipped"], 0);

    let response = server.get("/api/flashcards").await;
    let cards: Value = response.json();
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 3);
    for (i, card) in cards.iter().enumerate() {
        assert_eq!(card["front"], format!("Front {}", i + 1));
        assert_eq!(card["back"], format!("Back {}", i + 1));
        assert_eq!(card["order"], (i + 1) as f64);
        assert_eq!(card["subject_name"], subject.as_str());
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_reimport_duplicates_cards_after_existing_ones() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let content = fixtures::sample_flashcard_file(2);

    for _ in 0..2 {
        server
            .post("/api/flashcards/upload")
            .multipart(fixtures::upload_form(&content, Some("Rust")))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/flashcards").await;
    let cards: Value = response.json();
    let orders: Vec<f64> = cards
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["order"].as_f64().unwrap())
        .collect();
    assert_eq!(orders, vec![1.0, 2.0, 3.0, 4.0]);

    let response = server.get("/api/subjects").await;
    let subjects: Value = response.json();
    assert_eq!(subjects.as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_upload_without_subject_uses_general() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    server
        .post("/api/flashcards/upload")
        .multipart(fixtures::upload_form(&fixtures::sample_flashcard_file(1), None))
        .await
        .assert_status_ok();

    let response = server.get("/api/subjects").await;
    let subjects: Value = response.json();
    assert_eq!(subjects[0]["name"], "General");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_malformed_blocks_are_skipped() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let content = "F: \"good\"\nB: \"card\"\n\nF: \"missing back\"\n\nF: \"also\"\nB: \"fine\"\n";

    let response = server
        .post("/api/flashcards/upload")
        .multipart(fixtures::upload_form(content, Some("Rust")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["created"], 2);
    assert_eq!(body["skipped"], 1);
    assert_eq!(ctx.flashcard_count().await, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_empty_file_still_creates_subject() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/quizzes/upload")
        .multipart(fixtures::upload_form("", Some("Empty")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Successfully uploaded 0 items");

    let response = server.get("/api/subjects").await;
    let subjects: Value = response.json();
    assert_eq!(subjects[0]["name"], "Empty");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_quiz_upload_reads_points() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/quizzes/upload")
        .multipart(fixtures::upload_form(&fixtures::sample_quiz_file(2), Some("Math")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["created"], 2);

    let response = server.get("/api/quizzes").await;
    let quizzes: Value = response.json();
    let quizzes = quizzes.as_array().unwrap();
    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0]["question"], "Question 1?");
    assert_eq!(quizzes[0]["solution"], 2);
    assert_eq!(quizzes[0]["points"], 5);
    assert_eq!(quizzes[1]["points"], 1);
    assert_eq!(quizzes[1]["answer4"], "four");
}
