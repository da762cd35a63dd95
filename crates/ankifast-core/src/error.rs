//! Error types for ankifast-core

use card_parser::ParseError;
use thiserror::Error;

/// Errors that abort an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A highlighter failed on a code block
///
/// The renderer recovers by emitting the escaped source instead.
#[derive(Debug, Error)]
#[error("failed to highlight {language} code: {message}")]
pub struct HighlightError {
    pub language: String,
    pub message: String,
}

/// Template insertion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("invalid insertion range {start}..{end} for a document of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },
}
