//! LaTeX math transcoding
//!
//! Rewrites `$$...$$` and `$...$` spans into Anki's `[latex]` markup
//! before the text goes through the Markdown renderer.

use regex::Regex;
use std::sync::OnceLock;

/// Spacing commands whose backslash would be eaten by Markdown escaping
const SPACING_COMMANDS: [&str; 4] = [r"\;", r"\:", r"\,", r"\!"];

fn block_regex() -> &'static Regex {
    static BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"\$\$([^\r\n\x{2028}\x{2029}]*?)\$\$").expect("Invalid block math regex")
    })
}

fn inline_regex() -> &'static Regex {
    static INLINE_REGEX: OnceLock<Regex> = OnceLock::new();
    INLINE_REGEX.get_or_init(|| {
        Regex::new(r"\$([^\r\n\x{2028}\x{2029}]*?)\$").expect("Invalid inline math regex")
    })
}

/// Rewrite math spans into `[latex]` markup
///
/// Block spans are rewritten first; inline spans are then matched on the
/// block-rewritten text. Spans never cross a line break, including the
/// Unicode line and paragraph separators.
pub fn transcode(text: &str) -> String {
    if !text.contains('$') {
        return text.to_string();
    }

    let text = rewrite_spans(text, block_regex(), "displaymath");
    rewrite_spans(&text, inline_regex(), "math")
}

/// Replace each matched span, in match order, at its first occurrence
///
/// Identical span texts are therefore rewritten one occurrence per match.
fn rewrite_spans(text: &str, pattern: &Regex, environment: &str) -> String {
    let mut output = text.to_string();
    for caps in pattern.captures_iter(text) {
        let replacement = wrap_math(environment, &caps[1]);
        output = output.replacen(&caps[0], &replacement, 1);
    }
    output
}

fn wrap_math(environment: &str, body: &str) -> String {
    format!(
        "[latex]\\begin{{{environment}}}{}\\end{{{environment}}}[/latex]",
        escape_spacing(body)
    )
}

/// Prefix spacing commands with an escaped backslash (`\;` becomes `\\\;`)
///
/// Markdown rendering turns `\\\;` back into `\;`.
fn escape_spacing(body: &str) -> String {
    SPACING_COMMANDS
        .iter()
        .fold(body.to_string(), |acc, command| {
            acc.replace(command, &format!(r"\\{command}"))
        })
}
