//! Annotation (notes) index lookup structures.
//!
//! # Invariants
//! - Built once per reload by the notes loader and immutable afterwards.
//! - Every citekey referenced by `doi_index` / `title_year_index` is also in
//!   `citekeys`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Where the notes index document lives and where note pages are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesLocation {
    /// URL of the index document; relative row links resolve against it.
    pub document_url: Url,
    /// Origin used for synthesized note URLs, without trailing slash.
    pub origin: String,
}

impl NotesLocation {
    /// Uses the document URL's own origin for synthesized links.
    ///
    /// Opaque origins (`file:`, `data:`) fall back to the document's
    /// directory.
    pub fn new(document_url: Url) -> Self {
        let origin = document_origin(&document_url);
        Self {
            document_url,
            origin,
        }
    }

    /// Overrides the origin used for synthesized links.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Synthesizes `{origin}/{LETTER}/{citekey}`.
    ///
    /// `letter` wins over the citekey's first character when provided.
    pub fn synthesize_url(&self, citekey: &str, letter: Option<&str>) -> String {
        synthesize_note_url(&self.origin, citekey, letter)
    }
}

/// Normalized lookup tables over the notes index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesIndex {
    pub citekeys: BTreeSet<String>,
    /// Normalized DOI -> citekey.
    pub doi_index: BTreeMap<String, String>,
    /// `"normalized title@year"` -> citekey.
    pub title_year_index: BTreeMap<String, String>,
    /// Citekey -> absolute note URL.
    pub url_by_citekey: BTreeMap<String, String>,
    /// Origin used when a citekey has no recorded URL.
    pub origin: String,
}

impl NotesIndex {
    /// Empty index used when the notes source is unavailable.
    pub fn empty(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.citekeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citekeys.is_empty()
    }

    /// Returns the recorded URL or the synthesized fallback.
    pub fn url_for(&self, citekey: &str) -> String {
        self.url_by_citekey
            .get(citekey)
            .cloned()
            .unwrap_or_else(|| synthesize_note_url(&self.origin, citekey, None))
    }
}

fn document_origin(document_url: &Url) -> String {
    let origin = document_url.origin();
    if origin.is_tuple() {
        return origin.ascii_serialization();
    }
    document_url
        .join(".")
        .unwrap_or_else(|_| document_url.clone())
        .as_str()
        .trim_end_matches('/')
        .to_string()
}

fn synthesize_note_url(origin: &str, citekey: &str, letter: Option<&str>) -> String {
    let letter = letter
        .and_then(|value| value.trim().chars().next())
        .or_else(|| citekey.chars().next())
        .map(|value| value.to_uppercase().collect::<String>())
        .unwrap_or_default();
    format!("{}/{letter}/{citekey}", origin.trim_end_matches('/'))
}
