//! Explicit configuration for the store and notes collaborators.
//!
//! # Responsibility
//! - Hold credentials, library identity, page size and notes index location
//!   as one value handed to fetch collaborators at construction time.
//! - Load that value from the environment for embedding binaries.
//!
//! # Invariants
//! - A constructed `LibraryConfig` is always valid: non-blank numeric id,
//!   non-blank key, page size within `1..=MAX_PAGE_SIZE`.
//! - Core transformations never read configuration; only collaborators do.

use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Reference store API root.
pub const DEFAULT_API_BASE: &str = "https://api.zotero.org";
/// Store-side ceiling for one listing page.
pub const MAX_PAGE_SIZE: u32 = 100;
/// API version header value.
pub const API_VERSION: &str = "3";

pub const ENV_LIBRARY_TYPE: &str = "REFLINK_LIBRARY_TYPE";
pub const ENV_LIBRARY_ID: &str = "REFLINK_LIBRARY_ID";
pub const ENV_API_KEY: &str = "REFLINK_API_KEY";
pub const ENV_PAGE_SIZE: &str = "REFLINK_PAGE_SIZE";
pub const ENV_NOTES_INDEX_URL: &str = "REFLINK_NOTES_INDEX_URL";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required setting is absent or blank.
    Missing(&'static str),
    /// Library type is neither `user` nor `group`.
    InvalidLibraryType(String),
    /// Library id is not numeric.
    InvalidLibraryId(String),
    /// Page size is not a positive integer.
    InvalidPageSize(String),
    /// Notes index URL cannot be parsed.
    InvalidNotesUrl { value: String, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required setting `{name}`"),
            Self::InvalidLibraryType(value) => write!(
                f,
                "unsupported library type `{value}`; expected user|group"
            ),
            Self::InvalidLibraryId(value) => {
                write!(f, "library id must be numeric, got `{value}`")
            }
            Self::InvalidPageSize(value) => {
                write!(f, "page size must be a positive integer, got `{value}`")
            }
            Self::InvalidNotesUrl { value, message } => {
                write!(f, "invalid notes index url `{value}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Owner kind of the remote library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    User,
    Group,
}

impl LibraryKind {
    /// Parses `user`, `group` or `groups` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "group" | "groups" => Ok(Self::Group),
            other => Err(ConfigError::InvalidLibraryType(other.to_string())),
        }
    }

    fn path_segment(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

/// Validated collaborator configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub library: LibraryKind,
    pub library_id: String,
    api_key: String,
    pub page_size: u32,
    pub api_base: String,
    pub notes_index_url: Option<Url>,
}

impl std::fmt::Debug for LibraryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryConfig")
            .field("library", &self.library)
            .field("library_id", &self.library_id)
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("api_base", &self.api_base)
            .field("notes_index_url", &self.notes_index_url)
            .finish()
    }
}

impl LibraryConfig {
    /// Creates a validated configuration with the maximum page size.
    pub fn new(
        library: LibraryKind,
        library_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let library_id = normalize_library_id(library_id.into())?;
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        Ok(Self {
            library,
            library_id,
            api_key,
            page_size: MAX_PAGE_SIZE,
            api_base: DEFAULT_API_BASE.to_string(),
            notes_index_url: None,
        })
    }

    /// Sets the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    pub fn with_notes_index_url(mut self, url: Url) -> Self {
        self.notes_index_url = Some(url);
        self
    }

    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Library type defaults to `user` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let library = match read(ENV_LIBRARY_TYPE) {
            Some(value) => LibraryKind::parse(&value)?,
            None => LibraryKind::User,
        };
        let library_id = read(ENV_LIBRARY_ID).ok_or(ConfigError::Missing(ENV_LIBRARY_ID))?;
        let api_key = read(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let mut config = Self::new(library, library_id, api_key)?;

        if let Some(value) = read(ENV_PAGE_SIZE) {
            let parsed = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize(value.clone()))?;
            config = config.with_page_size(parsed);
        }

        if let Some(value) = read(ENV_NOTES_INDEX_URL) {
            let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidNotesUrl {
                value: value.clone(),
                message: err.to_string(),
            })?;
            config = config.with_notes_index_url(url);
        }

        Ok(config)
    }

    /// `{api_base}/{users|groups}/{id}`.
    pub fn library_base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.library.path_segment(),
            self.library_id
        )
    }

    /// First page URL for the collection listing.
    pub fn collections_url(&self) -> String {
        format!("{}/collections?limit={}", self.library_base_url(), self.page_size)
    }

    /// First page URL for one collection's items (attachments included).
    pub fn collection_items_url(&self, collection_key: &str) -> String {
        format!(
            "{}/collections/{}/items?limit={}",
            self.library_base_url(),
            collection_key,
            self.page_size
        )
    }

    /// Headers every store request must carry.
    pub fn request_headers(&self) -> [(&'static str, &str); 2] {
        [
            ("Zotero-API-Key", self.api_key.as_str()),
            ("Zotero-API-Version", API_VERSION),
        ]
    }
}

fn normalize_library_id(value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Missing(ENV_LIBRARY_ID));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidLibraryId(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
