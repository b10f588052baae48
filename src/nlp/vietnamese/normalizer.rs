use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static ELLIPSIS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{3,}").expect("ellipsis regex"));

static PUNCTUATION_SPACING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([,.!?;:])\s*").expect("punctuation spacing regex"));

/// Canonicalizes whitespace, quotes and punctuation spacing of raw input.
///
/// Every punctuation mark in `, . ! ? ; :` ends up glued to the preceding
/// token and followed by exactly one space (unless it ends the text), so the
/// function is idempotent.
pub fn normalize_text(text: &str) -> String {
    let text = collapse_whitespace(text);
    let text = replace_quotes(&text).replace('…', "...");
    let text = ELLIPSIS_PATTERN.replace_all(&text, "...");
    let text = PUNCTUATION_SPACING_PATTERN.replace_all(&text, "$1 ");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_PATTERN
        .replace_all(text.trim(), " ")
        .trim()
        .to_string()
}

fn replace_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '“' | '”' | '„' | '‟' => '"',
            '‘' | '’' | '‚' | '‛' => '\'',
            other => other,
        })
        .collect()
}
