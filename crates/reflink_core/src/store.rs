//! Collaborator contracts for the two external data sources.
//!
//! # Responsibility
//! - Define what core needs from the reference store and the notes source.
//! - Provide in-memory implementations for tests and embedding.
//!
//! # Invariants
//! - Implementations return fully materialized listings; pagination, retries
//!   and transport errors stay behind these traits.
//! - Core never calls a collaborator outside a reload.

use crate::model::collection::Collection;
use crate::model::entry::RawItem;
use crate::model::notes::NotesLocation;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by collaborator calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Source could not be reached or refused the request.
    Unavailable(String),
    /// Source answered with data that cannot be decoded.
    InvalidData(String),
    /// Requested collection is unknown to the store.
    CollectionNotFound(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "source unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid source data: {message}"),
            Self::CollectionNotFound(key) => write!(f, "collection not found: {key}"),
        }
    }
}

impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Remote bibliographic store.
pub trait ReferenceStore {
    /// Lists every collection of the library (flat).
    fn list_collections(&self) -> StoreResult<Vec<Collection>>;
    /// Lists every item of one collection, all pages concatenated.
    fn list_items(&self, collection_key: &str) -> StoreResult<Vec<RawItem>>;
}

/// Annotation index resource.
pub trait NotesSource {
    /// Where the index lives; relative links resolve against it.
    fn location(&self) -> &NotesLocation;
    /// Fetches and parses the index document.
    fn fetch_index(&self) -> StoreResult<Value>;
}

/// In-memory reference store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    collections: Vec<Collection>,
    items: BTreeMap<String, Vec<RawItem>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collection and its items.
    pub fn with_collection(mut self, collection: Collection, items: Vec<RawItem>) -> Self {
        self.items.insert(collection.key.clone(), items);
        self.collections.push(collection);
        self
    }

    /// Builds a store from store-shaped JSON listings.
    ///
    /// `collections` is an array of collection `data` objects; `items` maps a
    /// collection key to an array of item `data` objects.
    pub fn from_json(collections: &Value, items: &Value) -> StoreResult<Self> {
        let collections: Vec<Collection> = serde_json::from_value(collections.clone())?;
        let items: BTreeMap<String, Vec<RawItem>> = serde_json::from_value(items.clone())?;
        Ok(Self { collections, items })
    }
}

impl ReferenceStore for InMemoryReferenceStore {
    fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        Ok(self.collections.clone())
    }

    fn list_items(&self, collection_key: &str) -> StoreResult<Vec<RawItem>> {
        if let Some(items) = self.items.get(collection_key) {
            return Ok(items.clone());
        }
        if self
            .collections
            .iter()
            .any(|collection| collection.key == collection_key)
        {
            return Ok(Vec::new());
        }
        Err(StoreError::CollectionNotFound(collection_key.to_string()))
    }
}

/// In-memory notes source; `document: None` simulates an unreachable index.
#[derive(Debug, Clone)]
pub struct InMemoryNotesSource {
    location: NotesLocation,
    document: Option<Value>,
}

impl InMemoryNotesSource {
    pub fn new(location: NotesLocation, document: Value) -> Self {
        Self {
            location,
            document: Some(document),
        }
    }

    pub fn unavailable(location: NotesLocation) -> Self {
        Self {
            location,
            document: None,
        }
    }
}

impl NotesSource for InMemoryNotesSource {
    fn location(&self) -> &NotesLocation {
        &self.location
    }

    fn fetch_index(&self) -> StoreResult<Value> {
        self.document
            .clone()
            .ok_or_else(|| StoreError::Unavailable("notes index not reachable".to_string()))
    }
}

/// Extracts the `rel="next"` target from an HTTP `Link` header.
///
/// Store listings are paginated; implementors follow this link until it is
/// absent.
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .map(str::trim)
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part[start..].find('>')? + start;
            Some(part[start..end].to_string())
        })
        .filter(|url| !url.is_empty())
}
