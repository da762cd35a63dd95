//! Export rendering
//!
//! Flattens cards into rows and serializes them into Anki's plain-text
//! import format: one `title<TAB>content` line per question, with both
//! fields rendered to single-line HTML.

use crate::error::ExportError;
use crate::latex::transcode;
use crate::markdown::HtmlRenderer;
use card_parser::{Card, parse};
use rayon::prelude::*;
use std::borrow::Cow;

/// One question with its resolved answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub title: &'a str,
    /// The question's answer, or the card content when it has none
    pub content: &'a str,
}

/// Flatten cards into rows, card order then question order
pub fn export_rows(cards: &[Card]) -> Vec<ExportRow<'_>> {
    cards
        .iter()
        .flat_map(|card| card.resolved())
        .map(|(title, content)| ExportRow { title, content })
        .collect()
}

/// Options for export rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Rewrite `$`/`$$` math into `[latex]` markup before rendering
    pub latex: bool,
    /// Render rows on the rayon pool
    pub parallel: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            latex: true,
            parallel: true,
        }
    }
}

/// Result of exporting a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedExport {
    pub cards: usize,
    pub rows: usize,
    /// The export file contents
    pub body: String,
}

/// Renders cards into the export text format
pub struct Exporter<R> {
    renderer: R,
    options: ExportOptions,
}

impl<R: HtmlRenderer> Exporter<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_options(renderer, ExportOptions::default())
    }

    pub fn with_options(renderer: R, options: ExportOptions) -> Self {
        Self { renderer, options }
    }

    /// Parse `text` and render its cards
    pub fn export(&self, text: &str) -> Result<RenderedExport, ExportError> {
        let cards = parse(text)?;
        let rows = export_rows(&cards);
        tracing::debug!("Parsed {} cards into {} rows", cards.len(), rows.len());

        Ok(RenderedExport {
            cards: cards.len(),
            rows: rows.len(),
            body: self.render_rows(&rows),
        })
    }

    /// Render cards into the export text
    pub fn render(&self, cards: &[Card]) -> String {
        self.render_rows(&export_rows(cards))
    }

    /// Render rows and join them in their original order
    pub fn render_rows(&self, rows: &[ExportRow<'_>]) -> String {
        // Indexed collect keeps row order regardless of scheduling
        let lines: Vec<String> = if self.options.parallel {
            rows.par_iter().map(|row| self.render_row(row)).collect()
        } else {
            rows.iter().map(|row| self.render_row(row)).collect()
        };
        lines.concat()
    }

    /// Render a single `title<TAB>content` line
    pub fn render_row(&self, row: &ExportRow<'_>) -> String {
        format!(
            "{}\t{}\n",
            self.render_field(row.title),
            self.render_field(row.content)
        )
    }

    fn render_field(&self, text: &str) -> String {
        let text = if self.options.latex {
            Cow::Owned(transcode(text))
        } else {
            Cow::Borrowed(text)
        };
        strip_line_breaks(&self.renderer.render(&text))
    }
}

/// Remove line breaks so each row stays on one line
fn strip_line_breaks(html: &str) -> String {
    html.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
