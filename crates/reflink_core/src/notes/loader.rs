//! Notes index loader.
//!
//! # Responsibility
//! - Turn one notes index document into a `NotesIndex`.
//!
//! # Invariants
//! - Never fails: an unrecognized document yields an empty index.
//! - A row without a resolvable citekey is skipped; every other derivation
//!   (URL, DOI, title+year) soft-fails for that row only.
//! - On key collisions the first row in document order wins.

use crate::model::notes::{NotesIndex, NotesLocation};
use crate::normalize::{citekey_from_link, normalize_doi, title_year_key};
use crate::notes::shape::{IndexRow, IndexShape};
use log::{debug, info};
use serde_json::Value;

const CITEKEY_FIELDS: &[&str] = &["citekey", "citeKey", "slug"];
const LINK_FIELDS: &[&str] = &["link", "path", "href"];
const TITLE_FIELDS: &[&str] = &["title"];
const YEAR_FIELDS: &[&str] = &["year", "date"];
const DOI_FIELDS: &[&str] = &["doi", "DOI"];

/// Row counters reported by [`load_notes_index_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub skipped: usize,
    pub with_doi: usize,
    pub with_title_year: usize,
}

/// Builds the notes index from a parsed document.
pub fn load_notes_index(document: &Value, location: &NotesLocation) -> NotesIndex {
    load_notes_index_with_stats(document, location).0
}

/// Same as [`load_notes_index`], also returning row counters.
pub fn load_notes_index_with_stats(
    document: &Value,
    location: &NotesLocation,
) -> (NotesIndex, LoadStats) {
    let shape = IndexShape::classify(document);
    let rows = shape.rows();
    let mut index = NotesIndex::empty(location.origin.clone());
    let mut stats = LoadStats {
        rows: rows.len(),
        ..LoadStats::default()
    };

    for row in rows {
        if !ingest_row(&mut index, &mut stats, row, location) {
            stats.skipped += 1;
        }
    }

    info!(
        "event=notes_index_load module=notes status=ok shape={} rows={} citekeys={} skipped={}",
        shape.name(),
        stats.rows,
        index.len(),
        stats.skipped
    );
    (index, stats)
}

/// Records one row; returns `false` when the row has no citekey.
fn ingest_row(
    index: &mut NotesIndex,
    stats: &mut LoadStats,
    row: IndexRow<'_>,
    location: &NotesLocation,
) -> bool {
    let link = first_text(row.value, LINK_FIELDS);
    let citekey = first_text(row.value, CITEKEY_FIELDS)
        .or_else(|| link.as_deref().and_then(citekey_from_link));
    let Some(citekey) = citekey else {
        debug!("event=notes_row_skip module=notes status=skipped reason=no_citekey");
        return false;
    };

    let url = link
        .as_deref()
        .and_then(|link| resolve_link(location, link))
        .unwrap_or_else(|| location.synthesize_url(&citekey, row.letter));
    index.url_by_citekey.entry(citekey.clone()).or_insert(url);

    if let Some(doi) = first_text(row.value, DOI_FIELDS).and_then(|raw| normalize_doi(&raw)) {
        stats.with_doi += 1;
        index.doi_index.entry(doi).or_insert_with(|| citekey.clone());
    }

    let title = first_text(row.value, TITLE_FIELDS).unwrap_or_default();
    let year = first_text(row.value, YEAR_FIELDS).unwrap_or_default();
    if let Some(key) = title_year_key(&title, &year) {
        stats.with_title_year += 1;
        index
            .title_year_index
            .entry(key)
            .or_insert_with(|| citekey.clone());
    }

    index.citekeys.insert(citekey);
    true
}

fn resolve_link(location: &NotesLocation, link: &str) -> Option<String> {
    location
        .document_url
        .join(link)
        .map(|url| url.to_string())
        .ok()
}

/// First non-blank string (or number) among `fields`.
fn first_text(row: &Value, fields: &[&str]) -> Option<String> {
    let object = row.as_object()?;
    fields.iter().find_map(|field| match object.get(*field)? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::first_text;
    use serde_json::json;

    #[test]
    fn first_text_accepts_numbers_and_skips_blanks() {
        let row = json!({"year": 2020, "date": "2019", "slug": "  ", "citekey": ["x"]});
        assert_eq!(first_text(&row, &["year", "date"]).as_deref(), Some("2020"));
        assert_eq!(first_text(&row, &["slug", "date"]).as_deref(), Some("2019"));
        assert_eq!(first_text(&row, &["citekey"]), None);
        assert_eq!(first_text(&json!("row"), &["slug"]), None);
    }
}
