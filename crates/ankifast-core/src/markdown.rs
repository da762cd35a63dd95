//! Markdown to HTML rendering
//!
//! The exporter only depends on [`HtmlRenderer`]; [`MarkdownRenderer`] is
//! the default CommonMark implementation. Fenced code goes through a
//! [`Highlighter`] ([`SyntectHighlighter`] unless another is given) and
//! falls back to escaped source when the language is unknown or
//! highlighting fails.

use crate::error::HighlightError;
use crate::highlight::SyntectHighlighter;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Turns Markdown text into an HTML fragment
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

impl<F> HtmlRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Syntax highlighting for fenced code blocks
pub trait Highlighter: Send + Sync {
    /// Whether `language` is known to the highlighter
    fn supports(&self, language: &str) -> bool;

    /// Highlight `code`, returning HTML for the inside of `<code>`
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

/// Highlighter that knows no languages
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn supports(&self, _language: &str) -> bool {
        false
    }

    fn highlight(&self, code: &str, _language: &str) -> Result<String, HighlightError> {
        Ok(escape_code(code))
    }
}

/// CommonMark renderer with raw HTML passthrough, tables and strikethrough
pub struct MarkdownRenderer {
    options: Options,
    highlighter: Box<dyn Highlighter>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Renderer highlighting fenced code with [`SyntectHighlighter`]
    pub fn new() -> Self {
        Self::with_highlighter(SyntectHighlighter::new())
    }

    pub fn with_highlighter(highlighter: impl Highlighter + 'static) -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
            highlighter: Box::new(highlighter),
        }
    }

    /// Render a fenced code block as `<pre><code class="hljs">`
    fn render_code_block(&self, code: &str, language: &str) -> String {
        let body = if !language.is_empty() && self.highlighter.supports(language) {
            match self.highlighter.highlight(code, language) {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!("{e}; falling back to escaped code");
                    escape_code(code)
                }
            }
        } else {
            escape_code(code)
        };
        format!("<pre><code class=\"hljs\">{body}</code></pre>\n")
    }
}

impl HtmlRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut events = Vec::new();
        // (language, source) of the fenced block being collected
        let mut fence: Option<(String, String)> = None;

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let language = info.split_whitespace().next().unwrap_or_default();
                    fence = Some((language.to_string(), String::new()));
                }
                Event::Text(text) if fence.is_some() => {
                    if let Some((_, source)) = fence.as_mut() {
                        source.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if fence.is_some() => {
                    if let Some((language, source)) = fence.take() {
                        let block = self.render_code_block(&source, &language);
                        events.push(Event::Html(CowStr::from(block)));
                    }
                }
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }
}

/// Escape code for inclusion in HTML (`&`, `<`, `>` and `"`)
fn escape_code(code: &str) -> String {
    html_escape::encode_double_quoted_attribute(code).into_owned()
}
