//! Tag formatting.
//!
//! Tags are uppercase words made of Spanish letters separated by single
//! spaces. Free-text input is split on commas and each piece is formatted
//! independently.

/// Characters kept besides `A-Z` and whitespace.
const EXTRA_LETTERS: &[char] = &['Ñ', 'Á', 'É', 'Í', 'Ó', 'Ú', 'Ü'];

fn is_tag_char(c: char) -> bool {
    c.is_ascii_uppercase() || EXTRA_LETTERS.contains(&c) || c.is_whitespace()
}

/// Format one raw tag, or `None` if nothing valid remains.
///
/// ```
/// use maillots_core::tags::format_tag;
///
/// assert_eq!(format_tag("  azul   claro "), Some("AZUL CLARO".to_string()));
/// assert_eq!(format_tag("Ñandú!!"), Some("ÑANDÚ".to_string()));
/// assert_eq!(format_tag("!!"), None);
/// ```
pub fn format_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let kept: String = trimmed
        .to_uppercase()
        .chars()
        .filter(|c| is_tag_char(*c))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Outcome of parsing a comma-separated tag input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInput {
    /// Newly accepted tags, in input order.
    pub added: Vec<String>,
    /// Non-blank pieces that formatted to nothing (trimmed raw text).
    pub invalid: Vec<String>,
    /// Pieces whose formatted tag was already present.
    pub duplicates: usize,
}

impl TagInput {
    /// `existing` followed by the newly added tags.
    pub fn merged_with(&self, existing: &[String]) -> Vec<String> {
        existing.iter().chain(self.added.iter()).cloned().collect()
    }
}

/// Split `input` on commas and format each piece against `existing`.
pub fn parse_tag_input(input: &str, existing: &[String]) -> TagInput {
    let mut out = TagInput::default();
    for piece in input.split(',') {
        match format_tag(piece) {
            Some(tag) => {
                if existing.contains(&tag) || out.added.contains(&tag) {
                    out.duplicates += 1;
                } else {
                    out.added.push(tag);
                }
            }
            None => {
                let raw = piece.trim();
                if !raw.is_empty() {
                    out.invalid.push(raw.to_string());
                }
            }
        }
    }
    out
}
