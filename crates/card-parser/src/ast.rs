//! Card and question types
//!
//! A note is a sequence of cards. Each card owns the questions found in
//! its span; a question without an explicit answer falls back to the
//! card content.

use serde::{Deserialize, Serialize};

/// A content block and the questions asked about it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Text between the content header and the questions header (trimmed)
    pub content: String,
    /// Questions in encounter order
    pub questions: Vec<Question>,
}

/// A single question of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question title (non-empty, trimmed)
    pub title: String,
    /// Explicit answer, or `None` to reuse the card content
    pub answer: Option<String>,
}

impl Card {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            questions: Vec::new(),
        }
    }

    /// Builder-style helper used by tests and callers assembling cards by hand
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Iterate `(title, answer)` pairs with answers resolved against the card content
    pub fn resolved(&self) -> impl Iterator<Item = (&str, &str)> {
        self.questions
            .iter()
            .map(|q| (q.title.as_str(), q.answer_or(&self.content)))
    }
}

impl Question {
    pub fn new(title: impl Into<String>, answer: Option<String>) -> Self {
        Self {
            title: title.into(),
            answer,
        }
    }

    /// The explicit answer, or `fallback` when none was written
    pub fn answer_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.answer.as_deref().unwrap_or(fallback)
    }
}

/// Serialize cards as pretty-printed JSON
#[cfg(feature = "json")]
pub fn cards_to_json(cards: &[Card]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_falls_back_to_content() {
        let card = Card::new("Body")
            .with_question(Question::new("Q1", Some("A1".to_string())))
            .with_question(Question::new("Q2", None));

        let resolved: Vec<_> = card.resolved().collect();
        assert_eq!(resolved, vec![("Q1", "A1"), ("Q2", "Body")]);
    }

    #[test]
    fn test_card_without_questions_resolves_nothing() {
        let card = Card::new("Lonely");
        assert_eq!(card.resolved().count(), 0);
    }
}
