//! Raw item records and the canonical `Entry`.
//!
//! # Responsibility
//! - Mirror the item `data` object delivered by the reference store.
//! - Define the normalized `Entry` consumed by reconciliation and search.
//!
//! # Invariants
//! - `Entry::tags` holds unique values in first-occurrence order.
//! - `Entry::year` is either empty or exactly four ASCII digits.
//! - Notes fields are only set by the reconciler: `notes_citekey` and
//!   `notes_url` are `Some` iff `has_notes` is `true`.

use serde::{Deserialize, Serialize};

/// Creator role that contributes to `Entry::authors`.
pub const AUTHOR_ROLE: &str = "author";

/// One creator of a raw item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCreator {
    #[serde(default)]
    pub creator_type: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Single-field name used for institutional creators.
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCreator {
    /// Creates an author with split first/last name.
    pub fn author(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            creator_type: AUTHOR_ROLE.to_string(),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            name: None,
        }
    }

    /// Returns the family name, falling back to the single-field name.
    pub fn family_name(&self) -> Option<&str> {
        non_blank(self.last_name.as_deref()).or_else(|| non_blank(self.name.as_deref()))
    }

    /// Returns `"first last"` (or the single-field name).
    pub fn full_name(&self) -> Option<String> {
        match (
            non_blank(self.first_name.as_deref()),
            non_blank(self.last_name.as_deref()),
        ) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (None, Some(last)) => Some(last.to_string()),
            (first, None) => non_blank(self.name.as_deref())
                .or(first)
                .map(str::to_string),
        }
    }

    pub fn is_author(&self) -> bool {
        self.creator_type.trim().eq_ignore_ascii_case(AUTHOR_ROLE)
    }
}

/// One tag attached to a raw item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    pub tag: String,
}

/// Item record as delivered by the reference store.
///
/// Every field except `key` is optional in the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub key: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creators: Vec<RawCreator>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub publication_title: Option<String>,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub conference_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawItem {
    /// Creates a record with key and title only.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Canonical, normalized bibliographic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Store-side item key.
    pub id: String,
    pub title: String,
    /// Family names of creators with the author role, in input order.
    pub authors: Vec<String>,
    /// Four-digit year or empty.
    pub year: String,
    pub venue: String,
    pub item_type: String,
    pub tags: Vec<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub collection_key: String,
    /// Breadcrumb of the owning collection.
    pub collection_label: String,
    /// Lowercased composite field for substring search.
    pub search_text: String,
    pub has_notes: bool,
    pub notes_citekey: Option<String>,
    pub notes_url: Option<String>,
}

impl Entry {
    /// Returns the first author's family name, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
