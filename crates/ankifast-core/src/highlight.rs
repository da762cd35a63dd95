//! Fenced code highlighting with syntect

use crate::error::HighlightError;
use crate::markdown::Highlighter;
use std::sync::OnceLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Prefix of the span classes, matching highlight.js themes
const CLASS_PREFIX: &str = "hljs-";

fn default_syntaxes() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Class-based highlighter over syntect's bundled grammars
///
/// Tokens become `<span class="hljs-...">` elements; no inline styles are
/// emitted, so the deck's stylesheet decides the colors.
#[derive(Clone, Copy)]
pub struct SyntectHighlighter {
    syntaxes: &'static SyntaxSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: default_syntaxes(),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn supports(&self, language: &str) -> bool {
        self.syntaxes.find_syntax_by_token(language).is_some()
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .ok_or_else(|| HighlightError {
                language: language.to_string(),
                message: "unknown language".to_string(),
            })?;

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(generator.finalize())
    }
}
