//! Builder for ScienceDirect PUT search payloads
//!
//! The search endpoint takes its parameters as a JSON body. Queries are
//! plain `serde_json::Value` objects as far as
//! [`SciDirectSearch`](crate::SciDirectSearch) is concerned; this builder
//! is a typed convenience for the fields the API understands.
//!
//! Journal matching is word/phrase based, not exact: searching for
//! `Developmental Biology` also matches `Current Topics in Developmental
//! Biology`. Quote the phrase to at least keep the words together.

use serde::Serialize;
use serde_json::Value;

/// Sort orders accepted by the search endpoint's `display.sortBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Date,
    Relevance,
}

impl SortBy {
    fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Relevance => "relevance",
        }
    }
}

/// The `display` sub-object controlling paging and ordering
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    show: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
}

impl DisplayOptions {
    fn is_empty(&self) -> bool {
        self.show.is_none() && self.offset.is_none() && self.sort_by.is_none()
    }
}

/// Builder for the PUT search payload
///
/// Unset fields are omitted from the payload entirely.
///
/// # Example
///
/// ```
/// use scidirect_client_rs::{SearchQuery, SortBy};
///
/// let query = SearchQuery::new()
///     .journal("\"Neuron\"")
///     .query("mice")
///     .loaded_after("2021-04-01T00:00:00Z")
///     .sort_by(SortBy::Date)
///     .build();
///
/// assert_eq!(query["pub"], "\"Neuron\"");
/// assert_eq!(query["display"]["sortBy"], "date");
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    qs: Option<String>,
    #[serde(rename = "pub", skip_serializing_if = "Option::is_none")]
    journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<String>,
    #[serde(rename = "loadedAfter", skip_serializing_if = "Option::is_none")]
    loaded_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "openAccess", skip_serializing_if = "Option::is_none")]
    open_access: Option<bool>,
    #[serde(skip_serializing_if = "DisplayOptions::is_empty")]
    display: DisplayOptions,
}

impl SearchQuery {
    /// Create an empty query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-text search terms (`qs`). Supports AND/OR and quoted phrases;
    /// the reference section of articles is not searched.
    pub fn query(mut self, terms: impl Into<String>) -> Self {
        self.qs = Some(terms.into());
        self
    }

    /// Journal name words or quoted phrase (`pub`)
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    /// Title search terms
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Author search terms
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    /// Only articles loaded after this timestamp, e.g. `2021-04-01T00:00:00Z`.
    /// The API supports no date ranges, only this lower bound.
    pub fn loaded_after(mut self, timestamp: impl Into<String>) -> Self {
        self.loaded_after = Some(timestamp.into());
        self
    }

    /// Publication year filter
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Restrict to open-access articles
    pub fn open_access(mut self, open_access: bool) -> Self {
        self.open_access = Some(open_access);
        self
    }

    /// Page size requested via `display.show`
    pub fn show(mut self, show: u32) -> Self {
        self.display.show = Some(show);
        self
    }

    /// Starting offset via `display.offset`
    pub fn offset(mut self, offset: u32) -> Self {
        self.display.offset = Some(offset);
        self
    }

    /// Result ordering via `display.sortBy`
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.display.sort_by = Some(sort_by.as_str().to_string());
        self
    }

    /// Build the JSON payload accepted by [`SciDirectSearch`](crate::SciDirectSearch)
    pub fn build(&self) -> Value {
        serde_json::to_value(self).expect("SearchQuery serializes to a JSON object")
    }
}
