//! Card template insertion

use crate::error::TemplateError;
use std::ops::Range;

/// An empty card: content header, three blank lines, questions header and
/// a placeholder question
pub const TEMPLATE: &str = "##### content\n\n\n\n##### questions\n###### Question?";

/// Lines between the end of the template and the line reserved for content
const CONTENT_LINE_OFFSET: usize = 3;

/// Cursor position (0-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

/// A document with the template inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInsertion {
    pub text: String,
    /// Start of the blank content line of the inserted card
    pub cursor: Cursor,
}

/// Replace `range` of `document` with the card template
///
/// An empty range inserts at a cursor. The returned cursor sits three lines
/// above the end of the inserted text, on the middle blank line.
pub fn insert_template(
    document: &str,
    range: Range<usize>,
) -> Result<TemplateInsertion, TemplateError> {
    let Range { start, end } = range;
    if start > end
        || end > document.len()
        || !document.is_char_boundary(start)
        || !document.is_char_boundary(end)
    {
        return Err(TemplateError::InvalidRange {
            start,
            end,
            len: document.len(),
        });
    }

    let mut text = String::with_capacity(document.len() - (end - start) + TEMPLATE.len());
    text.push_str(&document[..start]);
    text.push_str(TEMPLATE);
    text.push_str(&document[end..]);

    let end_line = count_lines(&document[..start]) + count_lines(TEMPLATE);
    Ok(TemplateInsertion {
        text,
        cursor: Cursor {
            line: end_line.saturating_sub(CONTENT_LINE_OFFSET),
            column: 0,
        },
    })
}

/// Byte offset of the start of `line` (0-based), or the document length
/// when the document has fewer lines
pub fn line_offset(document: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    document
        .match_indices('\n')
        .nth(line - 1)
        .map(|(idx, _)| idx + 1)
        .unwrap_or(document.len())
}

fn count_lines(text: &str) -> usize {
    text.matches('\n').count()
}
