//! Weighted substring ranking.
//!
//! # Responsibility
//! - Score each candidate entry against a query.
//! - Return hits ordered by descending score.
//!
//! # Invariants
//! - Blank queries return no hits; falling back to an unfiltered listing is
//!   the caller's decision.
//! - Zero-score entries are never returned.
//! - Equal scores keep their input order (stable sort).
//! - Author weights are exclusive per author but add up across authors.

use crate::model::entry::Entry;

pub const AUTHOR_EXACT_WEIGHT: u32 = 100;
pub const AUTHOR_PREFIX_WEIGHT: u32 = 70;
pub const AUTHOR_CONTAINS_WEIGHT: u32 = 60;
pub const TITLE_WEIGHT: u32 = 30;
pub const VENUE_WEIGHT: u32 = 10;
pub const YEAR_WEIGHT: u32 = 5;
pub const SEARCH_TEXT_WEIGHT: u32 = 8;

/// Ranking options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// User query text.
    pub text: String,
    /// Restricts candidates to one collection key.
    pub collection_key: Option<String>,
    /// Maximum number of hits; `None` returns every scored entry.
    pub limit: Option<usize>,
}

impl SearchQuery {
    /// Creates an unrestricted, unlimited query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            collection_key: None,
            limit: None,
        }
    }

    /// Restricts the query to one collection.
    pub fn in_collection(mut self, collection_key: impl Into<String>) -> Self {
        self.collection_key = Some(collection_key.into());
        self
    }
}

/// Single ranked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub score: u32,
}

/// Ranks `entries` against `query`.
pub fn rank<'a>(entries: &'a [Entry], query: &SearchQuery) -> Vec<SearchHit<'a>> {
    let needle = query.text.trim().to_lowercase();
    if needle.is_empty() || query.limit == Some(0) {
        return Vec::new();
    }

    let mut hits = entries
        .iter()
        .filter(|entry| {
            query
                .collection_key
                .as_deref()
                .map_or(true, |key| entry.collection_key == key)
        })
        .filter_map(|entry| {
            let score = score_entry(entry, &needle);
            (score > 0).then_some(SearchHit { entry, score })
        })
        .collect::<Vec<_>>();

    // `sort_by` is stable: ties keep input order.
    hits.sort_by(|left, right| right.score.cmp(&left.score));
    if let Some(limit) = query.limit {
        hits.truncate(limit);
    }
    hits
}

/// Scores one entry against an already lowercased, trimmed needle.
///
/// Multi-author entries accumulate one author weight per matching author.
/// That amplification is observable behaviour and kept as is; it is a
/// candidate for re-tuning.
pub fn score_entry(entry: &Entry, needle: &str) -> u32 {
    let mut score = entry
        .authors
        .iter()
        .map(|author| author_weight(&author.to_lowercase(), needle))
        .sum::<u32>();

    if entry.title.to_lowercase().contains(needle) {
        score += TITLE_WEIGHT;
    }
    if entry.venue.to_lowercase().contains(needle) {
        score += VENUE_WEIGHT;
    }
    if entry.year == needle {
        score += YEAR_WEIGHT;
    }
    if entry.search_text.to_lowercase().contains(needle) {
        score += SEARCH_TEXT_WEIGHT;
    }
    score
}

fn author_weight(author: &str, needle: &str) -> u32 {
    if author == needle {
        AUTHOR_EXACT_WEIGHT
    } else if author.starts_with(needle) {
        AUTHOR_PREFIX_WEIGHT
    } else if author.contains(needle) {
        AUTHOR_CONTAINS_WEIGHT
    } else {
        0
    }
}
