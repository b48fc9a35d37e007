//! Block scanner for flashcard and quiz import files.
//!
//! # Format
//! ```text
//! F: "What is Rust?" B: "A systems programming language."
//!
//! Q: "Which keyword declares a constant?"
//! A1: "let" A2: "const" A3: "static" A4: "mut"
//! S: 2 P: 3
//! ```
//!
//! Values are double-quoted and may span lines; a value ends at the next
//! `"` (quotes cannot be escaped). `S` is the 1-based correct answer and `P`
//! the optional point value, defaulting to 1. Whitespace between markers is
//! free-form. Blocks that do not match are skipped and their starting line is
//! reported in [`ParseReport::skipped_lines`].

use crate::grading::validate_solution;
use crate::types::{ParseReport, RawFlashcard, RawQuiz};

const FLASHCARD_START: &str = "F:";
const QUIZ_START: &str = "Q:";
const DEFAULT_QUIZ_POINTS: i32 = 1;

/// Parse every `F: "..." B: "..."` block in `content`.
pub fn parse_flashcards(content: &str) -> ParseReport<RawFlashcard> {
    scan_blocks(content, FLASHCARD_START, |scanner, line_number| {
        let front = scanner.quoted()?;
        scanner.marker("B:")?;
        let back = scanner.quoted()?;

        Some(RawFlashcard {
            front: front.to_string(),
            back: back.to_string(),
            line_number,
        })
    })
}

/// Parse every `Q: ... A1..A4 ... S: n [P: n]` block in `content`.
pub fn parse_quizzes(content: &str) -> ParseReport<RawQuiz> {
    scan_blocks(content, QUIZ_START, |scanner, line_number| {
        let question = scanner.quoted()?;

        let mut answers: [String; 4] = Default::default();
        for (i, answer) in answers.iter_mut().enumerate() {
            scanner.marker(&format!("A{}:", i + 1))?;
            *answer = scanner.quoted()?.to_string();
        }

        scanner.marker("S:")?;
        let solution = validate_solution(scanner.integer()?).ok()?;
        let points = scanner.optional_points().unwrap_or(DEFAULT_QUIZ_POINTS);

        Some(RawQuiz {
            question: question.to_string(),
            answers,
            solution,
            points,
            line_number,
        })
    })
}

/// Find each `start` marker and try to read one block after it.
///
/// On success scanning resumes after the block; on failure it resumes right
/// after the marker, so a later well-formed block is still found.
fn scan_blocks<T, F>(content: &str, start: &str, mut read_block: F) -> ParseReport<T>
where
    F: FnMut(&mut Scanner<'_>, usize) -> Option<T>,
{
    let mut report = ParseReport::default();
    let mut search_from = 0;

    while let Some(found) = content[search_from..].find(start) {
        let block_start = search_from + found;
        let line_number = line_at(content, block_start);
        let mut scanner = Scanner::new(content, block_start + start.len());

        match read_block(&mut scanner, line_number) {
            Some(record) => {
                report.records.push(record);
                search_from = scanner.pos;
            }
            None => {
                report.skipped_lines.push(line_number);
                search_from = block_start + start.len();
            }
        }
    }

    report
}

/// 1-based line number of byte offset `pos`.
fn line_at(content: &str, pos: usize) -> usize {
    content[..pos].matches('\n').count() + 1
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn marker(&mut self, marker: &str) -> Option<()> {
        self.skip_whitespace();
        if self.rest().starts_with(marker) {
            self.pos += marker.len();
            Some(())
        } else {
            None
        }
    }

    /// Read a `"..."` value, returning its trimmed contents.
    fn quoted(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let body = self.rest().strip_prefix('"')?;
        let end = body.find('"')?;
        self.pos += end + 2;
        Some(body[..end].trim())
    }

    fn integer(&mut self) -> Option<i64> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return None;
        }
        let value = rest[..len].parse().ok()?;
        self.pos += len;
        Some(value)
    }

    /// Read a trailing `P: n`, leaving the position untouched when absent.
    fn optional_points(&mut self) -> Option<i32> {
        let saved = self.pos;
        let points = self
            .marker("P:")
            .and_then(|_| self.integer())
            .and_then(|n| i32::try_from(n).ok());
        if points.is_none() {
            self.pos = saved;
        }
        points
    }
}
