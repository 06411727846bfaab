//! Natural ordering of model identifiers.
//!
//! Identifiers are split into letter and number segments so that embedded
//! numbers compare by value: `2A < 10A < 10B`, where a plain string sort
//! would put `10A` first.
//!
//! # Tokenization
//!
//! The uppercased identifier is scanned left to right for
//! `([A-Z]*)([0-9]+)([A-Z]*)`, falling back to a pure letter run. A numeric
//! match emits three tokens (prefix letters, number, suffix letters); a
//! letter-only match emits one. Characters outside `A-Z0-9` separate
//! segments and are otherwise ignored.
//!
//! Token sequences are compared position by position: two numbers compare
//! by value, anything else by its string form. A sequence that is a prefix
//! of the other sorts first.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::CatalogEntry;

static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]*)([0-9]+)([A-Z]*)|([A-Z]+)|([0-9]+)").expect("segment pattern is valid")
});

/// A single comparable segment of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    /// Decimal digits with leading zeros removed (`"0"` for zero).
    Number(String),
}

impl Token {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Token::Number("0".to_string())
        } else {
            Token::Number(trimmed.to_string())
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Token::Text(s) | Token::Number(s) => s,
        }
    }
}

/// Split an identifier into natural-order tokens.
pub fn tokenize(id: &str) -> Vec<Token> {
    let upper = id.to_uppercase();
    let mut tokens = Vec::new();
    for caps in SEGMENT_RE.captures_iter(&upper) {
        if let Some(num) = caps.get(2) {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let suffix = caps.get(3).map_or("", |m| m.as_str());
            tokens.push(Token::Text(prefix.to_string()));
            tokens.push(Token::number(num.as_str()));
            tokens.push(Token::Text(suffix.to_string()));
        } else if let Some(text) = caps.get(4) {
            tokens.push(Token::Text(text.as_str().to_string()));
        } else if let Some(num) = caps.get(5) {
            tokens.push(Token::number(num.as_str()));
        }
    }
    tokens
}

/// Compare normalized digit strings by numeric value without parsing, so
/// arbitrarily long runs never overflow.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_tokens(a: &Token, b: &Token) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => cmp_digits(x, y),
        _ => a.as_str().cmp(b.as_str()),
    }
}

/// Natural comparison of two model identifiers.
///
/// Identifiers with identical token sequences (e.g. `a-1` and `A1`) are
/// ordered by their uppercased, then raw, text so that only equal strings
/// compare equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ta = tokenize(a);
    let tb = tokenize(b);
    for (x, y) in ta.iter().zip(tb.iter()) {
        let ord = cmp_tokens(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ta.len()
        .cmp(&tb.len())
        .then_with(|| a.to_uppercase().cmp(&b.to_uppercase()))
        .then_with(|| a.cmp(b))
}

/// [`natural_cmp`] on the entries' model identifiers.
pub fn cmp_entries(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    natural_cmp(&a.model_id, &b.model_id)
}

/// Sort entries into natural model order (stable).
pub fn sort_natural(entries: &mut [CatalogEntry]) {
    entries.sort_by(cmp_entries);
}
