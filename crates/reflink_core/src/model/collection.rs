//! Collection domain model.
//!
//! # Invariants
//! - `key` is unique within one library.
//! - `parent_key` should reference another collection of the same library;
//!   dangling or cyclic references are tolerated by the path resolver.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// One named group of bibliographic items.
///
/// Deserializes from the store's collection `data` object, where roots carry
/// `"parentCollection": false` instead of omitting the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(
        rename = "parentCollection",
        default,
        deserialize_with = "deserialize_parent_key"
    )]
    pub parent_key: Option<String>,
}

impl Collection {
    /// Creates a root collection.
    pub fn root(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            parent_key: None,
        }
    }

    /// Creates a collection nested under `parent_key`.
    pub fn child(
        key: impl Into<String>,
        name: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            parent_key: Some(parent_key.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParentRef {
    Key(String),
    /// `false` on roots; any other non-string value is treated the same.
    Other(IgnoredAny),
}

fn deserialize_parent_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<ParentRef>::deserialize(deserializer)?;
    Ok(match parent {
        Some(ParentRef::Key(key)) if !key.trim().is_empty() => Some(key.trim().to_string()),
        _ => None,
    })
}
