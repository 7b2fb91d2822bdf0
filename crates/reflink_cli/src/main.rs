//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `reflink_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use reflink_core::{
    load_notes_index, normalize_item, rank, NotesLocation, Reconciler, SearchQuery,
};

fn main() {
    println!("reflink_core ping={}", reflink_core::ping());
    println!("reflink_core version={}", reflink_core::core_version());

    // One-entry pipeline run: normalize, link, rank.
    let mut item = reflink_core::RawItem::new("PROBE1", "Probe entry");
    item.creators = vec![reflink_core::RawCreator::author("Ada", "Lovelace")];
    item.date = "1843".to_string();

    let location = match url::Url::parse("https://notes.invalid/index.json") {
        Ok(url) => NotesLocation::new(url),
        Err(err) => {
            println!("reflink_core probe=error reason={err}");
            return;
        }
    };
    let index = load_notes_index(
        &serde_json::json!([{ "citekey": "PROBE1" }]),
        &location,
    );

    let entries = normalize_item(&item, "ROOT", "Root")
        .map(|entry| Reconciler::new(&index).annotate(entry))
        .into_iter()
        .collect::<Vec<_>>();
    let hits = rank(&entries, &SearchQuery::new("lovelace"));
    println!(
        "reflink_core probe entries={} linked={} hits={}",
        entries.len(),
        entries.iter().filter(|entry| entry.has_notes).count(),
        hits.len()
    );
}
