//! Card parser
//!
//! Splits note text into cards and questions with a single forward pass of
//! the marker scanner.

use crate::ast::{Card, Question};
use crate::scanner::{Marker, PLACEHOLDER_TITLE, Scanner, Span};
use thiserror::Error;

/// Parser errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("content({content}) and questions({questions}) headers mismatch")]
    HeaderMismatch { content: usize, questions: usize },
}

/// Parse result type
pub type ParseResult<T> = Result<T, ParseError>;

/// Number of content and questions headers in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerCounts {
    pub content: usize,
    pub questions: usize,
}

impl MarkerCounts {
    pub fn is_balanced(&self) -> bool {
        self.content == self.questions
    }
}

/// Count content and questions headers in `text`
pub fn count_markers(text: &str) -> MarkerCounts {
    MarkerCounts {
        content: Marker::ContentHeader.count_in(text),
        questions: Marker::QuestionsHeader.count_in(text),
    }
}

/// Card parser over an immutable source
pub struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Parse the entire note
    ///
    /// Fails without a partial result when the header counts differ.
    pub fn parse(&self) -> ParseResult<Vec<Card>> {
        let counts = count_markers(self.source);
        if !counts.is_balanced() {
            return Err(ParseError::HeaderMismatch {
                content: counts.content,
                questions: counts.questions,
            });
        }

        let mut cards = Vec::with_capacity(counts.content);
        let mut scanner = Scanner::new(self.source);

        while scanner.skip_past(Marker::ContentHeader).is_some() {
            // The card runs up to the next content header
            let end = scanner
                .find(Marker::ContentHeader)
                .unwrap_or(self.source.len());
            cards.push(self.parse_card(scanner.span_to(end)));
            scanner.advance_to(end);
        }

        Ok(cards)
    }

    /// Parse a single card span (the text after its content header)
    fn parse_card(&self, span: Span) -> Card {
        let mut scanner = Scanner::within(self.source, span);

        // Without a questions header the whole span is scanned for questions
        let content = match scanner.find(Marker::QuestionsHeader) {
            Some(at) => {
                let content = scanner.span_to(at).slice(self.source).trim();
                scanner.advance_to(at + Marker::QuestionsHeader.byte_len());
                content
            }
            None => "",
        };

        let mut card = Card::new(content);
        card.questions = self.parse_questions(scanner);
        card
    }

    /// Scan the question region of a card
    fn parse_questions(&self, mut scanner: Scanner<'a>) -> Vec<Question> {
        let mut questions = Vec::new();

        while scanner.skip_past(Marker::QuestionPrefix).is_some() {
            let raw_title = scanner.peek_line().slice(self.source);
            let title = raw_title.trim();

            match classify_title(title) {
                TitleKind::Placeholder | TitleKind::Blank => continue,
                TitleKind::Question => {}
            }

            // The title is looked up by first occurrence from the cursor
            let title_start = scanner.find_str(raw_title).unwrap_or(scanner.pos());
            scanner.advance_to(title_start + raw_title.len());

            let answer_end = scanner
                .find(Marker::QuestionPrefix)
                .unwrap_or(scanner.end());
            let answer = scanner.span_to(answer_end).slice(self.source).trim();
            scanner.advance_to(answer_end);

            questions.push(Question::new(
                title,
                (!answer.is_empty()).then(|| answer.to_string()),
            ));
        }

        questions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitleKind {
    /// The unfilled question of the card template
    Placeholder,
    Blank,
    Question,
}

fn classify_title(title: &str) -> TitleKind {
    if title == PLACEHOLDER_TITLE {
        TitleKind::Placeholder
    } else if title.is_empty() {
        TitleKind::Blank
    } else {
        TitleKind::Question
    }
}

/// Parse note text into cards
pub fn parse(source: &str) -> ParseResult<Vec<Card>> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document() {
        let cards = parse("").unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn test_text_without_markers() {
        let cards = parse("just some notes\n###### stray question\n").unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn test_single_card() {
        let cards = parse("##### content\nHello\n\n##### questions\n###### Q1\nA1\n").unwrap();
        assert_eq!(
            cards,
            vec![Card::new("Hello").with_question(Question::new("Q1", Some("A1".to_string())))]
        );
    }

    #[test]
    fn test_question_without_answer() {
        let source = "##### content\nBody\n##### questions\n###### Q1\n###### Q2\nA2\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards[0].questions[0], Question::new("Q1", None));
        assert_eq!(cards[0].questions[1], Question::new("Q2", Some("A2".to_string())));
    }

    #[test]
    fn test_last_question_without_answer() {
        let cards = parse("##### content\nBody\n##### questions\n###### Only\n").unwrap();
        assert_eq!(cards[0].questions, vec![Question::new("Only", None)]);
    }

    #[test]
    fn test_header_mismatch() {
        let err = parse("##### content\n##### content\n##### questions\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::HeaderMismatch {
                content: 2,
                questions: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "content(2) and questions(1) headers mismatch"
        );
    }

    #[test]
    fn test_mismatch_without_content_headers() {
        let err = parse("##### questions\n###### Q\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::HeaderMismatch {
                content: 0,
                questions: 1
            }
        );
    }

    #[test]
    fn test_card_count_matches_header_count() {
        let card = "##### content\nc\n##### questions\n###### q\na\n";
        for n in 0..5 {
            let cards = parse(&card.repeat(n)).unwrap();
            assert_eq!(cards.len(), n);
        }
    }

    #[test]
    fn test_placeholder_question_is_skipped() {
        let source = "##### content\nBody\n##### questions\n###### Question?\n###### Real\nAnswer\n";
        let cards = parse(source).unwrap();
        assert_eq!(
            cards[0].questions,
            vec![Question::new("Real", Some("Answer".to_string()))]
        );
    }

    #[test]
    fn test_placeholder_with_surrounding_spaces_is_skipped() {
        let source = "##### content\nBody\n##### questions\n######  Question?  \n";
        let cards = parse(source).unwrap();
        assert!(cards[0].questions.is_empty());
    }

    #[test]
    fn test_placeholder_text_is_not_kept_as_answer() {
        // Text under a skipped placeholder belongs to no question
        let source = "##### content\nBody\n##### questions\n###### Question?\nstray\n";
        let cards = parse(source).unwrap();
        assert!(cards[0].questions.is_empty());
    }

    #[test]
    fn test_blank_title_is_skipped() {
        let source = "##### content\nBody\n##### questions\n###### \n###### Q\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards[0].questions, vec![Question::new("Q", None)]);
    }

    #[test]
    fn test_untouched_template() {
        let template = "##### content\n\n\n\n##### questions\n###### Question?";
        let cards = parse(template).unwrap();
        assert_eq!(cards, vec![Card::new("")]);
    }

    #[test]
    fn test_title_is_trimmed() {
        let source = "##### content\nBody\n##### questions\n######   Padded title   \nA\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards[0].questions[0].title, "Padded title");
        assert_eq!(cards[0].questions[0].answer.as_deref(), Some("A"));
    }

    #[test]
    fn test_title_repeated_in_answer() {
        // The title is located at the cursor even though its text recurs later
        let source = "##### content\nBody\n##### questions\n###### Why\nWhy not?\nWhy\n";
        let cards = parse(source).unwrap();
        assert_eq!(
            cards[0].questions,
            vec![Question::new("Why", Some("Why not?\nWhy".to_string()))]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = "##### content\r\nBody\r\n##### questions\r\n###### Q1\r\nA1\r\n###### Q2\r\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards[0].content, "Body");
        assert_eq!(
            cards[0].questions,
            vec![
                Question::new("Q1", Some("A1".to_string())),
                Question::new("Q2", None)
            ]
        );
    }

    #[test]
    fn test_answers_stop_at_next_card() {
        let source = "##### content\nC1\n##### questions\n###### Q1\nA1\n\
                      ##### content\nC2\n##### questions\n###### Q2\nA2\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].questions[0].answer.as_deref(), Some("A1"));
        assert_eq!(cards[1].content, "C2");
        assert_eq!(cards[1].questions[0].answer.as_deref(), Some("A2"));
    }

    #[test]
    fn test_card_without_questions_header() {
        // Counts balance overall, but the first card has no questions header
        let source = "##### content\nFirst\n###### Inline\n\
                      ##### content\nSecond\n##### questions\n##### questions\n###### Q\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].content, "");
        assert_eq!(cards[0].questions, vec![Question::new("Inline", None)]);
        assert_eq!(cards[1].content, "Second");
        assert_eq!(
            cards[1].questions,
            vec![Question::new("Q", None)]
        );
    }

    #[test]
    fn test_text_before_first_card_is_ignored() {
        let source = "# Title\n###### Not a card\n##### content\nC\n##### questions\n###### Q\n";
        let cards = parse(source).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].questions, vec![Question::new("Q", None)]);
    }

    #[test]
    fn test_card_with_zero_questions() {
        let cards = parse("##### content\nOnly content\n##### questions\n").unwrap();
        assert_eq!(cards, vec![Card::new("Only content")]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "##### content\nC\n##### questions\n###### Q1\n###### Q2\nA\n";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_count_markers() {
        let counts = count_markers("##### content\n##### questions\n##### content\n");
        assert_eq!(
            counts,
            MarkerCounts {
                content: 2,
                questions: 1
            }
        );
        assert!(!counts.is_balanced());
    }
}
