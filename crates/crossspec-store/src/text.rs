//! Lightweight text tokens shared by the index and the matcher

use std::collections::BTreeSet;

/// Lower-cased ASCII alphanumeric runs of `text`
///
/// Everything else separates tokens, so `brake_apply(level)` yields
/// `brake`, `apply` and `level`, and `100ms` stays one token.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect()
}
