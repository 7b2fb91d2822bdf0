use reflink_core::{
    build_snapshot, Collection, InMemoryNotesSource, InMemoryReferenceStore, LibraryService,
    LibraryServiceError, NotesLocation, RawCreator, RawItem, ReferenceStore, ReloadOutcome,
    SearchQuery, SnapshotCell, StoreError, StoreResult,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

fn location() -> NotesLocation {
    NotesLocation::new(Url::parse("https://notes.example.org/index.json").unwrap())
}

fn item(key: &str, title: &str, author: &str, date: &str) -> RawItem {
    let mut item = RawItem::new(key, title);
    item.creators = vec![RawCreator::author("A.", author)];
    item.date = date.to_string();
    item
}

fn store() -> InMemoryReferenceStore {
    InMemoryReferenceStore::new()
        .with_collection(
            Collection::root("ROOT", "Reading"),
            vec![item("I1", "Sorting Networks", "Batcher", "1968")],
        )
        .with_collection(
            Collection::child("LEAF", "Algorithms", "ROOT"),
            vec![
                item("I2", "Quicksort", "Hoare", "1962"),
                RawItem::new("I3", "PDF"),
            ],
        )
}

fn notes() -> InMemoryNotesSource {
    InMemoryNotesSource::new(
        location(),
        json!({"H": [{"citekey": "hoare1962", "title": "Quicksort", "year": "1962"}]}),
    )
}

struct SwitchableStore {
    inner: InMemoryReferenceStore,
    failing: Arc<AtomicBool>,
}

impl ReferenceStore for SwitchableStore {
    fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        self.inner.list_collections()
    }

    fn list_items(&self, collection_key: &str) -> StoreResult<Vec<RawItem>> {
        self.inner.list_items(collection_key)
    }
}

#[test]
fn reload_publishes_reconciled_snapshot() {
    let service = LibraryService::new(store(), notes());
    assert!(service.current().is_none());

    let outcome = service.reload().unwrap();

    let ReloadOutcome::Published(snapshot) = outcome else {
        panic!("first reload should publish");
    };
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.entries.len(), 2);
    assert!(snapshot.notes_available);
    assert_eq!(snapshot.linked_count(), 1);

    let quicksort = snapshot.entries_in("LEAF").next().unwrap();
    assert_eq!(quicksort.collection_label, "Reading → Algorithms");
    assert_eq!(quicksort.notes_citekey.as_deref(), Some("hoare1962"));
    assert_eq!(
        quicksort.notes_url.as_deref(),
        Some("https://notes.example.org/H/hoare1962")
    );
    assert_eq!(
        service.search(&SearchQuery::new("hoare")),
        vec![("I2".to_string(), 100 + 8)]
    );
}

#[test]
fn unreachable_notes_degrade_to_unlinked_entries() {
    let service = LibraryService::new(store(), InMemoryNotesSource::unavailable(location()));

    let ReloadOutcome::Published(snapshot) = service.reload().unwrap() else {
        panic!("degraded reload should still publish");
    };

    assert!(!snapshot.notes_available);
    assert!(snapshot.notes.is_empty());
    assert_eq!(snapshot.entries.len(), 2);
    assert_eq!(snapshot.linked_count(), 0);
}

#[test]
fn store_failure_keeps_previous_snapshot() {
    let failing = Arc::new(AtomicBool::new(false));
    let service = LibraryService::new(
        SwitchableStore {
            inner: store(),
            failing: Arc::clone(&failing),
        },
        notes(),
    );
    service.reload().unwrap();

    failing.store(true, Ordering::SeqCst);
    let error = service.reload().unwrap_err();

    assert!(matches!(
        error,
        LibraryServiceError::Collections(StoreError::Unavailable(_))
    ));
    let current = service.current().unwrap();
    assert_eq!(current.generation, 1);
    assert_eq!(current.entries.len(), 2);
}

#[test]
fn missing_collection_items_abort_the_build() {
    let store = InMemoryReferenceStore::from_json(
        &json!([{"key": "A", "name": "Alpha", "parentCollection": false}]),
        &json!({}),
    )
    .unwrap();
    let empty = build_snapshot(&store, &notes()).unwrap();
    assert!(empty.entries.is_empty());

    struct Lying;
    impl ReferenceStore for Lying {
        fn list_collections(&self) -> StoreResult<Vec<Collection>> {
            Ok(vec![Collection::root("GHOST", "Ghost")])
        }
        fn list_items(&self, collection_key: &str) -> StoreResult<Vec<RawItem>> {
            Err(StoreError::CollectionNotFound(collection_key.to_string()))
        }
    }

    let error = build_snapshot(&Lying, &notes()).unwrap_err();
    assert_eq!(
        error,
        LibraryServiceError::Items {
            collection_key: "GHOST".to_string(),
            source: StoreError::CollectionNotFound("GHOST".to_string()),
        }
    );
}

#[test]
fn repeated_collection_key_is_listed_once() {
    let store = InMemoryReferenceStore::from_json(
        &json!([
            {"key": "A", "name": "First", "parentCollection": false},
            {"key": "A", "name": "Second", "parentCollection": false}
        ]),
        &json!({"A": [{"key": "I1", "title": "Paper", "creators": [
            {"creatorType": "author", "lastName": "Hoare"}
        ]}]}),
    )
    .unwrap();
    let service = LibraryService::new(store, notes());

    let ReloadOutcome::Published(snapshot) = service.reload().unwrap() else {
        panic!("reload should publish");
    };

    let ids = snapshot
        .entries
        .iter()
        .map(|entry| entry.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["I1"]);
    assert_eq!(snapshot.entries[0].collection_label, "First");
    assert_eq!(service.search(&SearchQuery::new("hoare")).len(), 1);
}

#[test]
fn stale_reload_cannot_replace_newer_snapshot() {
    let cell = SnapshotCell::new();
    let older = cell.begin_reload();
    let newer = cell.begin_reload();

    let newer_snapshot = build_snapshot(&store(), &notes()).unwrap();
    let older_snapshot = build_snapshot(
        &InMemoryReferenceStore::new(),
        &InMemoryNotesSource::unavailable(location()),
    )
    .unwrap();

    assert!(cell.publish(newer, newer_snapshot).is_some());
    assert!(cell.publish(older, older_snapshot).is_none());

    let current = cell.current().unwrap();
    assert_eq!(current.generation, 2);
    assert_eq!(current.entries.len(), 2);
}

#[test]
fn concurrent_readers_see_whole_snapshots() {
    let service = Arc::new(LibraryService::new(store(), notes()));
    service.reload().unwrap();

    let readers = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let snapshot = service.current().unwrap();
                (snapshot.entries.len(), snapshot.linked_count())
            })
        })
        .collect::<Vec<_>>();
    service.reload().unwrap();

    for reader in readers {
        assert_eq!(reader.join().unwrap(), (2, 1));
    }
    assert_eq!(service.current().unwrap().generation, 2);
}
