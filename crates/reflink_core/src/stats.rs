//! Library statistics over reconciled entries.
//!
//! # Responsibility
//! - Group entries by tag for tag-index listings.
//! - Count the paper-type taxonomy and the remaining topic tags.
//! - Provide compact author labels and a stable listing sort key.
//!
//! # Invariants
//! - Data only: no rendering happens here.
//! - Every output ordering is total, so identical input yields identical
//!   output.

use crate::model::entry::Entry;
use crate::normalize::canonical_tag;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// Label for the bucket that folds topics beyond `top_n`.
pub const OTHER_LABEL: &str = "Other";

const MISSING_YEAR_SORT: &str = "9999";

/// Paper types expressed as single tags.
const PAPER_TYPE_SINGLES: &[&str] = &[
    "Theoretical paper",
    "Consciousness-raising paper",
    "Agenda setting paper",
    "Review paper",
    "Position paper",
    "PhD thesis",
];

/// Paper types expressed as `family | member` tags.
const PAPER_TYPE_MEMBERS: &[&str] = &[
    "Data driven | meta-study paper",
    "Data driven | artefact paper",
    "Data driven | work-in-progress paper",
    "Methods | method introduction paper",
    "Methods | tutorial paper",
    "Methods | method-mongering paper",
    "Methods | demonstration of concept paper",
];

/// Canonical tag -> display label for every paper type.
static PAPER_TYPES: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    PAPER_TYPE_SINGLES
        .iter()
        .chain(PAPER_TYPE_MEMBERS)
        .map(|label| (canonical_tag(label), *label))
        .collect()
});

/// Entries sharing one (case-insensitive) tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup<'a> {
    /// Lowercased grouping key.
    pub key: String,
    /// Display label: first spelling seen, capitalized (rest lowercased).
    pub label: String,
    pub entries: Vec<&'a Entry>,
}

/// Tag-index view of an entry set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagGroups<'a> {
    /// Groups sorted by lowercase label.
    pub groups: Vec<TagGroup<'a>>,
    pub untagged: Vec<&'a Entry>,
}

/// Groups entries by tag; an entry appears once per distinct tag.
pub fn group_by_tag(entries: &[Entry]) -> TagGroups<'_> {
    let mut by_key: BTreeMap<String, TagGroup<'_>> = BTreeMap::new();
    let mut untagged = Vec::new();

    for entry in entries {
        if entry.tags.is_empty() {
            untagged.push(entry);
            continue;
        }
        for tag in &entry.tags {
            let key = tag.trim().to_lowercase();
            let group = by_key.entry(key.clone()).or_insert_with(|| TagGroup {
                key,
                label: capitalize(tag.trim()),
                entries: Vec::new(),
            });
            if !group.entries.iter().any(|known| std::ptr::eq(*known, entry)) {
                group.entries.push(entry);
            }
        }
    }

    let mut groups = by_key.into_values().collect::<Vec<_>>();
    groups.sort_by_cached_key(|group| (group.label.to_lowercase(), group.key.clone()));
    for group in &mut groups {
        sort_for_listing(&mut group.entries);
    }
    sort_for_listing(&mut untagged);

    TagGroups { groups, untagged }
}

/// Sorts by (first author, year with missing last, title), case-insensitive.
pub fn sort_for_listing(entries: &mut [&Entry]) {
    entries.sort_by_cached_key(|entry| listing_key(entry));
}

fn listing_key(entry: &Entry) -> (String, String, String) {
    let year = if entry.year.is_empty() {
        MISSING_YEAR_SORT.to_string()
    } else {
        entry.year.clone()
    };
    (
        entry.first_author().unwrap_or_default().to_lowercase(),
        year,
        entry.title.to_lowercase(),
    )
}

/// Compact author label: `A`, `A & B` or `A et al.`.
pub fn short_author_label(authors: &[String]) -> String {
    match authors {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} & {second}"),
        [first, ..] => format!("{first} et al."),
    }
}

/// Counts paper-type tags, zero counts omitted.
///
/// Sorted by count descending, then label.
pub fn paper_type_counts(entries: &[Entry]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for tag in entries.iter().flat_map(|entry| entry.tags.iter()) {
        if let Some(label) = PAPER_TYPES.get(&canonical_tag(tag)) {
            *counts.entry(*label).or_default() += 1;
        }
    }
    sorted_counts(
        counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count)),
    )
}

/// Counts every non-paper-type tag by its original spelling.
///
/// Beyond `top_n` labels, the remainder is folded into [`OTHER_LABEL`].
pub fn topic_counts(entries: &[Entry], top_n: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for tag in entries.iter().flat_map(|entry| entry.tags.iter()) {
        if PAPER_TYPES.contains_key(&canonical_tag(tag)) {
            continue;
        }
        *counts.entry(tag.trim().to_string()).or_default() += 1;
    }

    let mut sorted = sorted_counts(counts.into_iter());
    if sorted.len() > top_n {
        let rest = sorted.split_off(top_n);
        sorted.push((
            OTHER_LABEL.to_string(),
            rest.iter().map(|(_, count)| count).sum(),
        ));
    }
    sorted
}

fn sorted_counts(counts: impl Iterator<Item = (String, usize)>) -> Vec<(String, usize)> {
    let mut sorted = counts.collect::<Vec<_>>();
    sorted.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    sorted
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
