//! Shared key normalization for reconciliation.
//!
//! # Responsibility
//! - Provide exactly one pure normalization function per lookup key type.
//! - Be the only place where DOI/title/year/citekey keys are derived, so the
//!   notes index loader and the reconciler always agree.
//!
//! # Invariants
//! - Every function is deterministic and never fails; unusable input yields
//!   `None` (or an empty string for free text).
//! - `title_year_key` only produces a key when both parts are non-empty.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static DOI_RESOLVER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(dx\.)?doi\.org/").expect("valid doi resolver regex"));
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));
static TAG_PIPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*").expect("valid tag pipe regex"));
static TAG_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}|]+").expect("valid tag symbol regex"));

const DOI_PREFIX: &str = "doi:";
const LINK_SUFFIXES: &[&str] = &[".html", ".md"];

/// Normalizes a DOI for lookup.
///
/// Rules, in order: lowercase, collapse whitespace, trim, strip a resolver
/// prefix (`https://doi.org/`, `http://dx.doi.org/`, ...), strip `doi:`.
pub fn normalize_doi(raw: &str) -> Option<String> {
    let lowered = collapse_whitespace(&raw.to_lowercase());
    let without_resolver = DOI_RESOLVER_RE.replace(&lowered, "");
    let without_prefix = without_resolver
        .strip_prefix(DOI_PREFIX)
        .unwrap_or(&without_resolver)
        .trim();

    if without_prefix.is_empty() {
        None
    } else {
        Some(without_prefix.to_string())
    }
}

/// Normalizes a title for title+year matching.
///
/// Lowercases, drops literal `{`/`}` (BibTeX protection braces) and collapses
/// whitespace.
pub fn normalize_title(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(['{', '}'], "");
    collapse_whitespace(&lowered)
}

/// Extracts the first run of exactly four digits.
///
/// Longer digit runs (`20201`) are not treated as years.
pub fn extract_year(raw: &str) -> Option<String> {
    DIGIT_RUN_RE
        .find_iter(raw)
        .map(|m| m.as_str())
        .find(|run| run.len() == 4)
        .map(str::to_string)
}

/// Builds the `"{normalized title}@{year}"` composite key.
pub fn title_year_key(title: &str, year_field: &str) -> Option<String> {
    let title = normalize_title(title);
    if title.is_empty() {
        return None;
    }
    let year = extract_year(year_field)?;
    Some(format!("{title}@{year}"))
}

/// Derives a citekey from a notes link.
///
/// Takes the final path segment (query and fragment ignored) and strips a
/// `.html` / `.md` suffix case-insensitively.
pub fn citekey_from_link(link: &str) -> Option<String> {
    let path = link
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or_default().trim();

    let lowered = segment.to_ascii_lowercase();
    let stem = LINK_SUFFIXES
        .iter()
        .find(|suffix| lowered.ends_with(*suffix))
        .map(|suffix| &segment[..segment.len() - suffix.len()])
        .unwrap_or(segment);

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Canonical comparison form for tags.
///
/// Tolerates case, dash/quote variants and spacing around `|` so that
/// `"Methods|Tutorial paper"` and `"methods | tutorial-paper"` compare equal.
pub fn canonical_tag(raw: &str) -> String {
    let folded = raw
        .to_lowercase()
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace('\u{2019}', "'");
    let piped = TAG_PIPE_RE.replace_all(&folded, " | ");
    let cleaned = TAG_SYMBOL_RE.replace_all(&piped, " ");
    collapse_whitespace(&cleaned)
}

pub(crate) fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        canonical_tag, citekey_from_link, extract_year, normalize_doi, normalize_title,
        title_year_key,
    };

    #[test]
    fn doi_resolver_and_prefix_forms_converge() {
        assert_eq!(
            normalize_doi("https://doi.org/10.1/ABC").as_deref(),
            Some("10.1/abc")
        );
        assert_eq!(normalize_doi("DOI:10.1/abc").as_deref(), Some("10.1/abc"));
        assert_eq!(
            normalize_doi("  http://dx.doi.org/10.1/abc ").as_deref(),
            Some("10.1/abc")
        );
    }

    #[test]
    fn blank_doi_is_none() {
        assert_eq!(normalize_doi("   "), None);
        assert_eq!(normalize_doi("doi:"), None);
    }

    #[test]
    fn title_drops_braces_and_extra_spaces() {
        assert_eq!(
            normalize_title("  The {LaTeX}   Companion "),
            "the latex companion"
        );
    }

    #[test]
    fn year_requires_exactly_four_digits() {
        assert_eq!(extract_year("2021-03-04").as_deref(), Some("2021"));
        assert_eq!(extract_year("March 1999").as_deref(), Some("1999"));
        assert_eq!(extract_year("no. 12345, 2007").as_deref(), Some("2007"));
        assert_eq!(extract_year("n.d."), None);
    }

    #[test]
    fn title_year_key_needs_both_parts() {
        assert_eq!(
            title_year_key("Deep {Learning}", "2015").as_deref(),
            Some("deep learning@2015")
        );
        assert_eq!(title_year_key("Deep Learning", "forthcoming"), None);
        assert_eq!(title_year_key("  ", "2015"), None);
    }

    #[test]
    fn citekey_uses_last_segment_without_suffix() {
        assert_eq!(
            citekey_from_link("notes/S/smith2020.HTML").as_deref(),
            Some("smith2020")
        );
        assert_eq!(
            citekey_from_link("https://example.org/n/doe2019.md?v=2#top").as_deref(),
            Some("doe2019")
        );
        assert_eq!(citekey_from_link("notes/"), Some("notes".to_string()));
        assert_eq!(citekey_from_link(".md"), None);
    }

    #[test]
    fn canonical_tag_tolerates_spacing_and_dashes() {
        assert_eq!(
            canonical_tag("Methods|Tutorial\u{2013}paper"),
            canonical_tag("methods | tutorial-paper")
        );
        assert_eq!(canonical_tag("Review paper"), "review paper");
    }
}
