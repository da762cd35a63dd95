//! Sentinel marker scanner
//!
//! Locates the literal markers of the note format inside an immutable
//! buffer. The scanner only ever moves a byte cursor forward; all results
//! are spans into the original input.

/// Opens a card; the card content follows on the next lines
pub const CONTENT_HEADER: &str = "##### content";
/// Separates the card content from its questions
pub const QUESTIONS_HEADER: &str = "##### questions";
/// Starts a question line; the title runs to the end of the line
pub const QUESTION_PREFIX: &str = "###### ";
/// Title of the unfilled question inserted by the card template
pub const PLACEHOLDER_TITLE: &str = "Question?";

/// The sentinel markers recognized in a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    ContentHeader,
    QuestionsHeader,
    QuestionPrefix,
}

impl Marker {
    /// The literal text of the marker
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContentHeader => CONTENT_HEADER,
            Self::QuestionsHeader => QUESTIONS_HEADER,
            Self::QuestionPrefix => QUESTION_PREFIX,
        }
    }

    /// Byte length of the marker
    pub fn byte_len(self) -> usize {
        self.as_str().len()
    }

    /// Count non-overlapping occurrences of the marker in `text`
    pub fn count_in(self, text: &str) -> usize {
        text.matches(self.as_str()).count()
    }
}

/// Byte range within the scanned input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The text covered by this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// Forward-only cursor over a window of the input
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    /// Current byte position
    pos: usize,
    /// End of the scanned window (exclusive)
    end: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over the whole input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            end: input.len(),
        }
    }

    /// Create a scanner restricted to `span` of the input
    pub fn within(input: &'a str, span: Span) -> Self {
        let end = span.end.min(input.len());
        Self {
            input,
            pos: span.start.min(end),
            end,
        }
    }

    /// Current byte position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// End of the window
    pub fn end(&self) -> usize {
        self.end
    }

    /// Unscanned remainder of the window
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..self.end]
    }

    /// Start of the next occurrence of `marker`, without moving
    pub fn find(&self, marker: Marker) -> Option<usize> {
        self.find_str(marker.as_str())
    }

    /// Start of the next occurrence of `needle`, without moving
    pub fn find_str(&self, needle: &str) -> Option<usize> {
        self.remaining().find(needle).map(|offset| self.pos + offset)
    }

    /// Move past the next occurrence of `marker`, returning the marker's span
    ///
    /// The cursor does not move when the marker is absent.
    pub fn skip_past(&mut self, marker: Marker) -> Option<Span> {
        let start = self.find(marker)?;
        let span = Span::new(start, start + marker.byte_len());
        self.pos = span.end;
        Some(span)
    }

    /// Move the cursor forward to `pos`, clamped to the window
    pub fn advance_to(&mut self, pos: usize) {
        self.pos = pos.clamp(self.pos, self.end);
    }

    /// Span from the cursor to the next line break (`\r` or `\n`) or window end
    ///
    /// The cursor does not move.
    pub fn peek_line(&self) -> Span {
        let rest = self.remaining();
        let len = rest.find(['\r', '\n']).unwrap_or(rest.len());
        Span::new(self.pos, self.pos + len)
    }

    /// Span from the cursor to `end`, clamped to the window
    pub fn span_to(&self, end: usize) -> Span {
        Span::new(self.pos, end.clamp(self.pos, self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_literals() {
        assert_eq!(Marker::ContentHeader.as_str(), "##### content");
        assert_eq!(Marker::QuestionsHeader.as_str(), "##### questions");
        assert_eq!(Marker::QuestionPrefix.as_str(), "###### ");
    }

    #[test]
    fn test_count_is_literal_substring() {
        // A question titled "content" also contains the content header
        let text = "##### content\n###### content\n##### contents";
        assert_eq!(Marker::ContentHeader.count_in(text), 3);
        assert_eq!(Marker::QuestionsHeader.count_in(text), 0);
    }

    #[test]
    fn test_find_does_not_move() {
        let scanner = Scanner::new("abc ##### content");
        assert_eq!(scanner.find(Marker::ContentHeader), Some(4));
        assert_eq!(scanner.pos(), 0);
    }

    #[test]
    fn test_skip_past() {
        let mut scanner = Scanner::new("x ###### y");
        let span = scanner.skip_past(Marker::QuestionPrefix).unwrap();
        assert_eq!(span, Span::new(2, 9));
        assert_eq!(scanner.remaining(), "y");
        assert!(scanner.skip_past(Marker::QuestionPrefix).is_none());
        assert_eq!(scanner.pos(), 9);
    }

    #[test]
    fn test_within_limits_search() {
        let input = "aaa ###### bbb ###### ccc";
        let scanner = Scanner::within(input, Span::new(0, 8));
        assert_eq!(scanner.find(Marker::QuestionPrefix), None);
        assert_eq!(scanner.remaining(), "aaa ####");
    }

    #[test]
    fn test_peek_line_stops_at_any_line_break() {
        let input = "title\r\nrest";
        let scanner = Scanner::new(input);
        assert_eq!(scanner.peek_line().slice(input), "title");

        let input = "title\rrest";
        assert_eq!(Scanner::new(input).peek_line().slice(input), "title");

        let input = "no break";
        assert_eq!(Scanner::new(input).peek_line().slice(input), "no break");
    }

    #[test]
    fn test_advance_never_moves_backwards() {
        let mut scanner = Scanner::new("0123456789");
        scanner.advance_to(5);
        scanner.advance_to(2);
        assert_eq!(scanner.pos(), 5);
        scanner.advance_to(100);
        assert_eq!(scanner.pos(), scanner.end());
    }
}
