//! card-parser: Parser for flashcard notes
//!
//! This crate provides:
//! - Sentinel marker scanning over an immutable buffer
//! - The card/question splitting parser
//! - Card and Question types
//!
//! # Example
//!
//! ```
//! use card_parser::parse;
//!
//! let source = "##### content\nHello\n\n##### questions\n###### Q1\nA1\n";
//!
//! let cards = parse(source).unwrap();
//! assert_eq!(cards.len(), 1);
//! assert_eq!(cards[0].content, "Hello");
//! assert_eq!(cards[0].questions[0].answer.as_deref(), Some("A1"));
//! ```

pub mod ast;
pub mod parser;
pub mod scanner;

// Re-export main types for convenient access
pub use ast::{Card, Question};
#[cfg(feature = "json")]
pub use ast::cards_to_json;
pub use parser::{MarkerCounts, ParseError, ParseResult, Parser, count_markers, parse};
pub use scanner::{
    CONTENT_HEADER, Marker, PLACEHOLDER_TITLE, QUESTION_PREFIX, QUESTIONS_HEADER, Scanner, Span,
};
