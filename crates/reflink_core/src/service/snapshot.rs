//! Reload results and their atomic publication.
//!
//! # Responsibility
//! - Bundle everything one reload produced into an immutable snapshot.
//! - Publish snapshots as whole replacements, newest reload wins.
//!
//! # Invariants
//! - Readers only ever observe complete snapshots.
//! - Tickets are strictly increasing; a snapshot built under an older ticket
//!   never replaces one built under a newer ticket.
//! - Dropping a ticket without publishing leaves the current snapshot intact.

use crate::catalog::paths::CollectionPaths;
use crate::model::collection::Collection;
use crate::model::entry::Entry;
use crate::model::notes::NotesIndex;
use crate::notes::reconciler::ReconcileStats;
use crate::search::ranker::{rank, SearchHit, SearchQuery};
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Complete, immutable result of one reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySnapshot {
    /// Ticket generation the snapshot was built under.
    pub generation: u64,
    pub collections: Vec<Collection>,
    pub paths: CollectionPaths,
    /// Reconciled entries in collection listing order.
    pub entries: Vec<Entry>,
    pub notes: NotesIndex,
    pub reconcile: ReconcileStats,
    /// `false` when the notes source failed and `notes` is empty.
    pub notes_available: bool,
}

impl LibrarySnapshot {
    /// Entries owned by one collection, in listing order.
    pub fn entries_in<'a>(&'a self, collection_key: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.collection_key == collection_key)
    }

    /// Ranks this snapshot's entries.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        rank(&self.entries, query)
    }

    /// Number of entries linked to notes.
    pub fn linked_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.has_notes).count()
    }
}

/// Ordering token for one reload.
#[derive(Debug, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
}

impl ReloadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holder of the currently published snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    last_ticket: AtomicU64,
    published: RwLock<Option<Arc<LibrarySnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a reload and returns its ticket.
    pub fn begin_reload(&self) -> ReloadTicket {
        ReloadTicket {
            generation: self.last_ticket.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Publishes `snapshot` if no newer reload has published yet.
    ///
    /// Returns the published handle, or `None` when the reload was superseded.
    pub fn publish(
        &self,
        ticket: ReloadTicket,
        mut snapshot: LibrarySnapshot,
    ) -> Option<Arc<LibrarySnapshot>> {
        snapshot.generation = ticket.generation;
        let mut published = self
            .published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(current) = published.as_ref() {
            if current.generation >= ticket.generation {
                info!(
                    "event=snapshot_publish module=service status=superseded generation={} current={}",
                    ticket.generation, current.generation
                );
                return None;
            }
        }

        let snapshot = Arc::new(snapshot);
        *published = Some(Arc::clone(&snapshot));
        info!(
            "event=snapshot_publish module=service status=ok generation={} entries={}",
            snapshot.generation,
            snapshot.entries.len()
        );
        Some(snapshot)
    }

    /// Currently published snapshot.
    pub fn current(&self) -> Option<Arc<LibrarySnapshot>> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
