use reflink_core::{load_notes_index, load_notes_index_with_stats, NotesLocation};
use serde_json::json;
use url::Url;

fn location() -> NotesLocation {
    NotesLocation::new(Url::parse("https://notes.example.org/library/index.json").unwrap())
}

fn rows() -> serde_json::Value {
    json!([
        {"citekey": "doe2019", "title": "On Graphs", "year": 2019, "doi": "10.5/GRAPH"},
        {"citekey": "smith2020", "title": "Deep {Nets}", "date": "2020-01-01"}
    ])
}

#[test]
fn three_document_shapes_build_identical_indexes() {
    let flat = load_notes_index(&rows(), &location());
    let wrapped = load_notes_index(&json!({ "entries": rows() }), &location());
    let lettered = load_notes_index(
        &json!({
            "S": [{"citekey": "smith2020", "title": "Deep {Nets}", "date": "2020-01-01"}],
            "D": [{"citekey": "doe2019", "title": "On Graphs", "year": 2019, "doi": "10.5/GRAPH"}]
        }),
        &location(),
    );

    assert_eq!(flat, load_notes_index(&rows(), &location()));
    assert_eq!(flat, wrapped);
    assert_eq!(flat, lettered);
    assert_eq!(flat.len(), 2);
    assert_eq!(flat.doi_index.get("10.5/graph").map(String::as_str), Some("doe2019"));
    assert_eq!(
        flat.title_year_index.get("deep nets@2020").map(String::as_str),
        Some("smith2020")
    );
}

#[test]
fn unrecognized_document_yields_empty_index() {
    let (index, stats) = load_notes_index_with_stats(&json!({"version": 3}), &location());

    assert!(index.is_empty());
    assert!(index.doi_index.is_empty());
    assert_eq!(index.origin, "https://notes.example.org");
    assert_eq!(stats.rows, 0);
}

#[test]
fn rows_without_citekey_are_skipped_individually() {
    let document = json!([
        {"title": "No key here", "year": "2001"},
        "not an object",
        {"slug": "kept2001", "title": "Kept"},
        {"link": "K/linked2002.html"}
    ]);

    let (index, stats) = load_notes_index_with_stats(&document, &location());

    assert_eq!(stats.rows, 4);
    assert_eq!(stats.skipped, 2);
    assert!(index.citekeys.contains("kept2001"));
    assert!(index.citekeys.contains("linked2002"));
    assert!(index.title_year_index.is_empty());
}

#[test]
fn relative_links_resolve_against_document_url() {
    let document = json!([
        {"citekey": "rel2020", "link": "notes/R/rel2020.html"},
        {"citekey": "abs2020", "href": "https://elsewhere.example.com/abs2020"},
        {"citekey": "syn2020"}
    ]);

    let index = load_notes_index(&document, &location());

    assert_eq!(
        index.url_for("rel2020"),
        "https://notes.example.org/library/notes/R/rel2020.html"
    );
    assert_eq!(
        index.url_for("abs2020"),
        "https://elsewhere.example.com/abs2020"
    );
    assert_eq!(index.url_for("syn2020"), "https://notes.example.org/S/syn2020");
}

#[test]
fn section_letter_drives_synthesized_url() {
    let document = json!({"x": [{"citekey": "vanrossum1995"}]});
    let location = location().with_origin("https://site.example/");

    let index = load_notes_index(&document, &location);

    assert_eq!(
        index.url_for("vanrossum1995"),
        "https://site.example/X/vanrossum1995"
    );
}

#[test]
fn doi_spellings_collapse_to_one_key() {
    let document = json!([
        {"citekey": "first", "doi": "https://doi.org/10.1000/ABC"},
        {"citekey": "second", "DOI": "doi:10.1000/abc"}
    ]);

    let index = load_notes_index(&document, &location());

    assert_eq!(index.doi_index.len(), 1);
    assert_eq!(
        index.doi_index.get("10.1000/abc").map(String::as_str),
        Some("first")
    );
    assert_eq!(index.len(), 2);
}
