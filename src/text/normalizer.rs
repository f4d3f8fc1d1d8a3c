//! Markup stripping for the text sent to the speech engine

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that looks like an HTML tag
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Runs of markdown emphasis/heading/code characters
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_#`]+").expect("valid markup pattern"));

/// Two or more whitespace characters
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace pattern"));

/// Normalize raw text into the plain string that is actually spoken
///
/// Tags and markup runs become single spaces, whitespace runs collapse to a
/// single space, and the result is trimmed. Total over all strings.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = TAG.replace_all(raw, " ");
    let text = MARKUP.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
