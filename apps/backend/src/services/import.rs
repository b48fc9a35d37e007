//! Bulk import of flashcards and quizzes from uploaded text files.
//!
//! Records are created one at a time. A store error stops the import but rows
//! already written stay written.

use axum::extract::Multipart;
use flashcard_core::{
    check_subject_name, parse_flashcards, parse_quizzes, ImportKind, ParseReport, RawFlashcard,
    RawQuiz, DEFAULT_SUBJECT,
};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{NewFlashcard, NewQuiz, UploadResponse};

const FILE_FIELD: &str = "file";
const SUBJECT_FIELD: &str = "subject";

/// Fields read from a multipart upload
#[derive(Debug, Default)]
pub struct Upload {
    pub file: Option<String>,
    pub subject: Option<String>,
}

impl Upload {
    /// Subject to import into, falling back to the default for blank names
    pub fn subject_name(&self) -> &str {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SUBJECT)
    }

    /// File contents, or MissingInput when no file was sent
    pub fn require_file(&self) -> Result<&str> {
        self.file
            .as_deref()
            .ok_or_else(|| ApiError::MissingInput("No file uploaded".to_string()))
    }
}

/// Collect the `file` and `subject` fields of a multipart body
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let bytes = field.bytes().await?;
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    ApiError::InvalidInput("Uploaded file must be UTF-8 text".to_string())
                })?;
                upload.file = Some(text);
            }
            SUBJECT_FIELD => upload.subject = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(upload)
}

/// Parse and store every record of `kind` found in the upload
pub async fn import(db: &Database, upload: &Upload, kind: ImportKind) -> Result<UploadResponse> {
    let content = upload.require_file()?;
    let subject_name = check_subject_name(upload.subject_name())?;

    let (created, skipped) = match kind {
        ImportKind::Flashcard => {
            let report = parse_flashcards(content);
            warn_skipped(kind, &report);
            let skipped = report.skipped();
            (import_flashcards(db, subject_name, report.records).await?, skipped)
        }
        ImportKind::Quiz => {
            let report = parse_quizzes(content);
            warn_skipped(kind, &report);
            let skipped = report.skipped();
            (import_quizzes(db, subject_name, report.records).await?, skipped)
        }
    };

    tracing::info!(
        "Imported {} {} records into '{}' ({} skipped)",
        created,
        kind.as_str(),
        subject_name,
        skipped
    );

    Ok(UploadResponse::new(created, skipped))
}

fn warn_skipped<T>(kind: ImportKind, report: &ParseReport<T>) {
    if report.skipped() > 0 {
        tracing::warn!(
            "Skipped {} malformed {} blocks starting at lines {:?}",
            report.skipped(),
            kind.as_str(),
            report.skipped_lines
        );
    }
}

async fn import_flashcards(
    db: &Database,
    subject_name: &str,
    records: Vec<RawFlashcard>,
) -> Result<usize> {
    let subject = db.upsert_subject_by_name(subject_name).await?;
    let mut order = db.max_flashcard_order().await?;

    let mut created = 0;
    for raw in records {
        order += 1.0;
        db.create_flashcard(&NewFlashcard::from_raw(raw, subject.id, order))
            .await?;
        created += 1;
    }

    Ok(created)
}

async fn import_quizzes(
    db: &Database,
    subject_name: &str,
    records: Vec<RawQuiz>,
) -> Result<usize> {
    let subject = db.upsert_subject_by_name(subject_name).await?;

    let mut created = 0;
    for raw in records {
        db.create_quiz(&NewQuiz::from_raw(raw, subject.id)).await?;
        created += 1;
    }

    Ok(created)
}
