//! ankifast-core: Core library for exporting flashcard notes to Anki
//!
//! This crate provides:
//! - Card parsing (re-exported from `card-parser`)
//! - LaTeX math transcoding to Anki's `[latex]` markup
//! - Markdown to HTML rendering behind an injectable renderer
//! - Class-based syntax highlighting of fenced code
//! - Export rendering to Anki's tab-separated text format
//! - Export file naming and selection fingerprints
//! - The card template and its insertion into a document

pub mod error;
pub mod export;
pub mod fingerprint;
pub mod highlight;
pub mod latex;
pub mod markdown;
pub mod naming;
pub mod template;

pub use card_parser::{
    Card, MarkerCounts, ParseError, Question, cards_to_json, count_markers, parse,
};
pub use error::{ExportError, HighlightError, TemplateError};
pub use export::{ExportOptions, ExportRow, Exporter, RenderedExport, export_rows};
pub use fingerprint::fingerprint;
pub use highlight::SyntectHighlighter;
pub use latex::transcode;
pub use markdown::{Highlighter, HtmlRenderer, MarkdownRenderer, NoHighlight};
pub use naming::FileNaming;
pub use template::{Cursor, TEMPLATE, TemplateInsertion, insert_template, line_offset};
