use regex::Regex;
use std::sync::LazyLock;

static URLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?\S+|www\S+").expect("url pattern is valid"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s.,!?_:]").expect("charset pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize a comment before classification: drop links, keep alphanumerics and
/// basic punctuation, collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let text = URLS.replace_all(text, "");
    let text = DISALLOWED.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Lowercased word tokens (letters, digits and inner apostrophes).
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
}
