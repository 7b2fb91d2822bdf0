//! Entry -> notes linkage.
//!
//! # Responsibility
//! - Resolve a notes citekey for each entry through fixed-priority tiers.
//!
//! # Invariants
//! - Tier order is DOI, then title+year, then identity; the first hit wins,
//!   regardless of how the notes index was ordered.
//! - Keys are derived with the same functions the loader used.
//! - An unmatched entry keeps `has_notes == false` and no notes fields.

use crate::model::entry::Entry;
use crate::model::notes::NotesIndex;
use crate::normalize::{normalize_doi, title_year_key};
use log::info;

/// Match strategy that produced a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    Doi,
    TitleYear,
    Identity,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::TitleYear => "title_year",
            Self::Identity => "identity",
        }
    }
}

/// Resolved link for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesMatch {
    pub tier: MatchTier,
    pub citekey: String,
    pub url: String,
}

/// Per-tier counters from [`Reconciler::reconcile_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub doi: usize,
    pub title_year: usize,
    pub identity: usize,
    pub unmatched: usize,
}

impl ReconcileStats {
    pub fn linked(&self) -> usize {
        self.doi + self.title_year + self.identity
    }
}

/// Links entries against one notes index.
pub struct Reconciler<'a> {
    index: &'a NotesIndex,
}

impl<'a> Reconciler<'a> {
    pub fn new(index: &'a NotesIndex) -> Self {
        Self { index }
    }

    /// Finds the notes record for `entry`, trying tiers in priority order.
    pub fn resolve(&self, entry: &Entry) -> Option<NotesMatch> {
        let (tier, citekey) = self
            .by_doi(entry)
            .map(|citekey| (MatchTier::Doi, citekey))
            .or_else(|| {
                self.by_title_year(entry)
                    .map(|citekey| (MatchTier::TitleYear, citekey))
            })
            .or_else(|| {
                self.by_identity(entry)
                    .map(|citekey| (MatchTier::Identity, citekey))
            })?;

        Some(NotesMatch {
            tier,
            url: self.index.url_for(citekey),
            citekey: citekey.to_string(),
        })
    }

    /// Returns `entry` annotated with its notes link (or explicitly unlinked).
    pub fn annotate(&self, entry: Entry) -> Entry {
        let found = self.resolve(&entry);
        apply_match(entry, found)
    }

    /// Annotates every entry, preserving order.
    pub fn reconcile_all(&self, entries: Vec<Entry>) -> (Vec<Entry>, ReconcileStats) {
        let mut stats = ReconcileStats::default();
        let annotated = entries
            .into_iter()
            .map(|entry| {
                let found = self.resolve(&entry);
                match found.as_ref().map(|found| found.tier) {
                    Some(MatchTier::Doi) => stats.doi += 1,
                    Some(MatchTier::TitleYear) => stats.title_year += 1,
                    Some(MatchTier::Identity) => stats.identity += 1,
                    None => stats.unmatched += 1,
                }
                apply_match(entry, found)
            })
            .collect::<Vec<_>>();

        info!(
            "event=reconcile module=notes status=ok doi={} title_year={} identity={} unmatched={}",
            stats.doi, stats.title_year, stats.identity, stats.unmatched
        );
        (annotated, stats)
    }

    fn by_doi(&self, entry: &Entry) -> Option<&'a str> {
        let doi = normalize_doi(entry.doi.as_deref()?)?;
        self.index.doi_index.get(&doi).map(String::as_str)
    }

    fn by_title_year(&self, entry: &Entry) -> Option<&'a str> {
        let key = title_year_key(&entry.title, &entry.year)?;
        self.index.title_year_index.get(&key).map(String::as_str)
    }

    fn by_identity(&self, entry: &Entry) -> Option<&'a str> {
        self.index.citekeys.get(entry.id.as_str()).map(String::as_str)
    }
}

fn apply_match(mut entry: Entry, found: Option<NotesMatch>) -> Entry {
    entry.has_notes = found.is_some();
    entry.notes_citekey = found.as_ref().map(|found| found.citekey.clone());
    entry.notes_url = found.map(|found| found.url);
    entry
}
