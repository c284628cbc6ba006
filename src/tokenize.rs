/// Whitespace tokenizer for short texts.
///
/// Splits on whitespace and trims non-alphanumeric characters from each
/// token's edges (apostrophes are kept, so contractions survive intact).
/// Order and duplicates are preserved.
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Split `text` into word tokens.
///
/// Tokens that become empty after trimming (pure punctuation) are dropped.
/// Each call restarts the sequence from the beginning of `text`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        })
        .filter(|t| !t.is_empty())
        .collect()
}
