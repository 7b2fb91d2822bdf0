//! Raw item -> `Entry` normalization.
//!
//! # Responsibility
//! - Filter placeholder/attachment records.
//! - Derive authors, year, venue and the composite search text.
//!
//! # Invariants
//! - Exclusion is silent and never an error.
//! - Output order follows input order; normalization is deterministic.
//! - Produced entries are never linked to notes (`has_notes == false`).

use crate::model::entry::{Entry, RawItem};
use crate::normalize::{collapse_whitespace, extract_year};
use log::debug;
use std::collections::HashSet;

/// Delimiter between `search_text` fields.
pub const SEARCH_TEXT_DELIMITER: &str = " | ";

const PLACEHOLDER_TITLES: &[&str] = &["pdf", "untitled"];

/// Whether a title marks a placeholder record rather than a reference.
pub fn is_placeholder_title(title: &str) -> bool {
    let trimmed = title.trim();
    trimmed.is_empty()
        || PLACEHOLDER_TITLES
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

/// Normalizes one raw item owned by `collection_key`.
///
/// Returns `None` for placeholder records.
pub fn normalize_item(item: &RawItem, collection_key: &str, collection_label: &str) -> Option<Entry> {
    if is_placeholder_title(&item.title) {
        return None;
    }

    let title = item.title.trim().to_string();
    let authors = item
        .creators
        .iter()
        .filter(|creator| creator.is_author())
        .filter_map(|creator| creator.family_name())
        .map(str::to_string)
        .collect::<Vec<_>>();
    let year = extract_year(&item.date).unwrap_or_default();
    let venue = select_venue(item);
    let tags = unique_tags(item);
    let search_text = build_search_text(item, &title, &venue, &year, &tags);

    Some(Entry {
        id: item.key.clone(),
        title,
        authors,
        year,
        venue,
        item_type: item.item_type.trim().to_string(),
        tags,
        doi: non_blank(item.doi.as_deref()),
        url: non_blank(item.url.as_deref()),
        collection_key: collection_key.to_string(),
        collection_label: collection_label.to_string(),
        search_text,
        has_notes: false,
        notes_citekey: None,
        notes_url: None,
    })
}

/// Normalizes a full collection listing, preserving input order.
pub fn normalize_collection(
    items: &[RawItem],
    collection_key: &str,
    collection_label: &str,
) -> Vec<Entry> {
    let entries = items
        .iter()
        .filter_map(|item| normalize_item(item, collection_key, collection_label))
        .collect::<Vec<_>>();
    debug!(
        "event=collection_normalized module=catalog status=ok items={} entries={} excluded={}",
        items.len(),
        entries.len(),
        items.len() - entries.len()
    );
    entries
}

fn select_venue(item: &RawItem) -> String {
    [
        item.publication_title.as_deref(),
        item.book_title.as_deref(),
        item.conference_name.as_deref(),
    ]
    .into_iter()
    .find_map(non_blank)
    .unwrap_or_default()
}

fn unique_tags(item: &RawItem) -> Vec<String> {
    let mut seen = HashSet::new();
    item.tags
        .iter()
        .map(|tag| tag.tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

fn build_search_text(
    item: &RawItem,
    title: &str,
    venue: &str,
    year: &str,
    tags: &[String],
) -> String {
    let creators = item
        .creators
        .iter()
        .filter_map(|creator| creator.full_name())
        .collect::<Vec<_>>()
        .join(" ");
    let tags = tags.join(" ");

    [
        title,
        creators.as_str(),
        venue,
        year,
        item.item_type.as_str(),
        tags.as_str(),
        item.language.as_deref().unwrap_or_default(),
    ]
    .into_iter()
    .map(collapse_whitespace)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(SEARCH_TEXT_DELIMITER)
    .to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{is_placeholder_title, normalize_item};
    use crate::model::entry::{RawCreator, RawItem, RawTag};

    #[test]
    fn placeholder_titles_are_case_insensitive() {
        assert!(is_placeholder_title(" pdf "));
        assert!(is_placeholder_title("Untitled"));
        assert!(is_placeholder_title("   "));
        assert!(!is_placeholder_title("PDF parsing at scale"));
    }

    #[test]
    fn search_text_skips_empty_fields_in_fixed_order() {
        let mut item = RawItem::new("K1", "Graph Theory");
        item.item_type = "book".to_string();
        item.date = "1998".to_string();
        item.creators = vec![RawCreator::author("Frank", "Harary")];
        item.tags = vec![RawTag {
            tag: "Math".to_string(),
        }];
        item.language = Some("en".to_string());

        let entry = normalize_item(&item, "C1", "Library").unwrap();
        assert_eq!(
            entry.search_text,
            "graph theory | frank harary | 1998 | book | math | en"
        );
    }
}
