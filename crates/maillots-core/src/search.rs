//! Relevance ranking for catalog lookups.
//!
//! Queries and candidate fields are normalized the same way (lowercased,
//! all whitespace removed) and matched by substring. Each entry falls in
//! one [`MatchTier`]; results are ordered by tier, then by natural model
//! order.
//!
//! | Tier | Condition |
//! |------|-----------|
//! | 1 | model id equals the query |
//! | 2 | model id starts with the query |
//! | 3 | model id contains the query |
//! | 4 | some tag contains the query |
//! | 5 | no match (never returned by [`rank`]) |

use crate::models::CatalogEntry;
use crate::natural::{cmp_entries, natural_cmp};

/// How well an entry matches a query. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Exact = 1,
    Prefix = 2,
    Contains = 3,
    Tag = 4,
    NoMatch = 5,
}

impl MatchTier {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Prefix => "prefix",
            MatchTier::Contains => "contains",
            MatchTier::Tag => "tag",
            MatchTier::NoMatch => "none",
        }
    }
}

/// Lowercase and drop every whitespace character.
pub fn normalize_query(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classify one entry against an already-normalized query.
pub fn match_tier(entry: &CatalogEntry, normalized_query: &str) -> MatchTier {
    let model = normalize_query(&entry.model_id);
    if model == normalized_query {
        return MatchTier::Exact;
    }
    if model.starts_with(normalized_query) {
        return MatchTier::Prefix;
    }
    if model.contains(normalized_query) {
        return MatchTier::Contains;
    }
    if entry
        .tags
        .iter()
        .any(|tag| normalize_query(tag).contains(normalized_query))
    {
        return MatchTier::Tag;
    }
    MatchTier::NoMatch
}

/// A ranked hit.
#[derive(Debug, Clone)]
pub struct RankedEntry<'a> {
    pub entry: &'a CatalogEntry,
    /// `None` when the query was blank and no ranking took place.
    pub tier: Option<MatchTier>,
}

/// Filter and order `entries` for a raw user query.
///
/// A blank query returns the full catalog in natural order.
pub fn rank<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<RankedEntry<'a>> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        let mut all: Vec<&CatalogEntry> = entries.iter().collect();
        all.sort_by(|a, b| cmp_entries(a, b));
        return all
            .into_iter()
            .map(|entry| RankedEntry { entry, tier: None })
            .collect();
    }

    let mut hits: Vec<(MatchTier, &CatalogEntry)> = entries
        .iter()
        .map(|entry| (match_tier(entry, &normalized), entry))
        .filter(|(tier, _)| *tier != MatchTier::NoMatch)
        .collect();
    hits.sort_by(|(ta, a), (tb, b)| ta.cmp(tb).then_with(|| natural_cmp(&a.model_id, &b.model_id)));

    hits.into_iter()
        .map(|(tier, entry)| RankedEntry {
            entry,
            tier: Some(tier),
        })
        .collect()
}
