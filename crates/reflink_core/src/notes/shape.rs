//! Notes index document shape detection.
//!
//! The index document is produced by an external site generator and has been
//! seen in three shapes:
//!
//! ```text
//! [ {row}, {row} ]                         plain rows
//! { "entries": [ {row} ] }                 wrapped rows ("items" also accepted)
//! { "A": [ {row} ], "B": [ {row} ] }       letter-keyed sections
//! ```
//!
//! Classification happens once; flattening is a single routine.

use serde_json::{Map, Value};

const WRAPPER_FIELDS: &[&str] = &["entries", "items"];

/// Classified notes index document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexShape<'a> {
    /// Top-level array of rows.
    Rows(&'a [Value]),
    /// Object with an `entries`/`items` array.
    Wrapped(&'a [Value]),
    /// Object keyed by single letters, each holding rows.
    Lettered(&'a Map<String, Value>),
    Unrecognized,
}

/// One flattened row plus the letter section it came from, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexRow<'a> {
    pub letter: Option<&'a str>,
    pub value: &'a Value,
}

impl<'a> IndexShape<'a> {
    /// Classifies a parsed document.
    pub fn classify(document: &'a Value) -> Self {
        match document {
            Value::Array(rows) => Self::Rows(rows),
            Value::Object(map) => {
                let wrapped = WRAPPER_FIELDS
                    .iter()
                    .find_map(|field| map.get(*field).and_then(Value::as_array));
                if let Some(rows) = wrapped {
                    return Self::Wrapped(rows);
                }
                if is_lettered(map) {
                    return Self::Lettered(map);
                }
                Self::Unrecognized
            }
            _ => Self::Unrecognized,
        }
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rows(_) => "rows",
            Self::Wrapped(_) => "wrapped",
            Self::Lettered(_) => "lettered",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Flattens the document into rows in document order.
    ///
    /// Letter sections are visited in key order.
    pub fn rows(&self) -> Vec<IndexRow<'a>> {
        match *self {
            Self::Rows(rows) | Self::Wrapped(rows) => rows
                .iter()
                .map(|value| IndexRow {
                    letter: None,
                    value,
                })
                .collect(),
            Self::Lettered(map) => {
                let mut sections = map.iter().collect::<Vec<_>>();
                sections.sort_by(|(left, _), (right, _)| left.cmp(right));
                sections
                    .into_iter()
                    .filter_map(|(letter, rows)| rows.as_array().map(|rows| (letter, rows)))
                    .flat_map(|(letter, rows)| {
                        rows.iter().map(move |value| IndexRow {
                            letter: Some(letter.as_str()),
                            value,
                        })
                    })
                    .collect()
            }
            Self::Unrecognized => Vec::new(),
        }
    }
}

fn is_lettered(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map
            .iter()
            .all(|(key, value)| key.chars().count() == 1 && value.is_array())
}
