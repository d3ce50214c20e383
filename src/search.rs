//! Paginated search against the ScienceDirect PUT endpoint
//!
//! One [`SciDirectSearch`] drives one logical query across one or more PUT
//! calls, either taking a single page as the API returns it or exhaustively
//! advancing `display.offset` until every match (or the configured cap) has
//! been pulled down.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::client::SciDirectClient;
use crate::error::{Result, SciDirectError};
use crate::reference::SciDirectReference;
use crate::responses;

/// Default cap on the number of results pulled down by one search
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// Default number of results requested per API call in exhaustive mode
pub const DEFAULT_INCREMENT: usize = 100;

/// How a search treats results beyond the first response page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// One PUT call; the query's own `display` settings decide the page
    #[default]
    SinglePage,
    /// Repeated PUT calls advancing `display.offset` until the total match
    /// count or the configured cap is reached
    Exhaustive,
}

/// A search against the ScienceDirect full-text search API
///
/// # Example
///
/// ```no_run
/// use scidirect_client_rs::{SciDirectClient, SciDirectSearch, SearchQuery};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SciDirectClient::new("your_api_key");
///     let query = SearchQuery::new().journal("\"Neuron\"").query("mice").build();
///
///     let mut search = SciDirectSearch::new(client, query)?
///         .exhaustive()
///         .with_max_results(500);
///     search.execute().await?;
///
///     println!(
///         "retrieved {} of {:?} matches",
///         search.count_retrieved(),
///         search.total_found()
///     );
///     Ok(())
/// }
/// ```
pub struct SciDirectSearch {
    client: SciDirectClient,
    query: Value,
    mode: PaginationMode,
    max_results: usize,
    increment: usize,
    dump_path: Option<PathBuf>,
    total_found: Option<u64>,
    records: Vec<Map<String, Value>>,
}

impl SciDirectSearch {
    /// Create a search over the given query payload
    ///
    /// The query must be a JSON object; any other shape is rejected here,
    /// before any network activity.
    pub fn new(client: SciDirectClient, query: Value) -> Result<Self> {
        if !query.is_object() {
            return Err(SciDirectError::InvalidQuery(
                "query must be a JSON object".to_string(),
            ));
        }

        Ok(Self {
            client,
            query,
            mode: PaginationMode::default(),
            max_results: DEFAULT_MAX_RESULTS,
            increment: DEFAULT_INCREMENT,
            dump_path: None,
            total_found: None,
            records: Vec::new(),
        })
    }

    /// Set the pagination mode
    pub fn with_mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for [`PaginationMode::Exhaustive`]
    pub fn exhaustive(self) -> Self {
        self.with_mode(PaginationMode::Exhaustive)
    }

    /// Cap the number of results pulled down across all pages
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the number of results requested per call in exhaustive mode
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment;
        self
    }

    /// Write the accumulated raw records to this path after each execution
    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_path = Some(path.into());
        self
    }

    /// Execute the search
    ///
    /// Re-running re-executes the whole protocol and overwrites previously
    /// accumulated records. A failure mid-pagination leaves the records
    /// accumulated so far in place and propagates the error.
    #[instrument(skip(self))]
    pub async fn execute(&mut self) -> Result<()> {
        let url = self.client.search_url();
        self.records.clear();
        self.total_found = None;

        // Pagination works on a derived copy; the caller's query value is
        // never mutated and can be reused across searches.
        let mut query = self.query.clone();
        let mut offset = match self.mode {
            PaginationMode::SinglePage => 0,
            PaginationMode::Exhaustive => {
                if self.increment == 0 {
                    return Err(SciDirectError::InvalidQuery(
                        "increment must be nonzero for exhaustive pagination".to_string(),
                    ));
                }
                prepare_paging(&mut query, self.increment)?
            }
        };

        let response = self.client.put_json(&url, &query).await?;
        let total = responses::results_found(&response)?;
        self.total_found = Some(total);
        debug!(total, "search executed");

        if total == 0 {
            return Ok(());
        }

        self.records = responses::result_records(&response)?;
        self.records.truncate(self.max_results);

        if self.mode == PaginationMode::Exhaustive {
            while (self.records.len() as u64) < total && self.records.len() < self.max_results {
                offset += self.increment as u64;
                set_offset(&mut query, offset)?;

                let response = self.client.put_json(&url, &query).await?;
                let page = responses::result_records(&response)?;
                if page.is_empty() {
                    // The API stopped advancing; bail out rather than loop
                    // forever against an unreachable total.
                    warn!(
                        offset,
                        retrieved = self.records.len(),
                        total,
                        "page returned no new records, stopping pagination early"
                    );
                    break;
                }
                self.records.extend(page);
                self.records.truncate(self.max_results);
            }
        }

        info!(
            retrieved = self.records.len(),
            total, "search results accumulated"
        );

        if let Some(path) = &self.dump_path {
            self.dump_records(path).await?;
        }
        Ok(())
    }

    /// Total number of matches reported by the API; `None` before the first
    /// execution has received a response
    pub fn total_found(&self) -> Option<u64> {
        self.total_found
    }

    /// Number of raw records pulled down so far
    pub fn count_retrieved(&self) -> usize {
        self.records.len()
    }

    /// The raw result records, in retrieval order
    pub fn raw_records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    /// Lazily wrap each raw record as a [`SciDirectReference`]
    ///
    /// Derived fresh from the current records on every call, so iterating
    /// does not consume the result set.
    pub fn references(&self) -> impl Iterator<Item = Result<SciDirectReference>> + '_ {
        self.records
            .iter()
            .map(|record| SciDirectReference::new(self.client.clone(), record.clone()))
    }

    /// The query payload this search was built with
    pub fn query(&self) -> &Value {
        &self.query
    }

    /// The configured pagination mode
    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// The configured per-call page size
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// The configured result cap
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// The shared transport client
    pub fn client(&self) -> &SciDirectClient {
        &self.client
    }

    async fn dump_records(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_vec_pretty(&self.records)?;
        tokio::fs::write(path, payload)
            .await
            .map_err(|e| SciDirectError::IoError {
                message: format!("failed to write {}: {e}", path.display()),
            })?;
        info!(
            path = %path.display(),
            records = self.records.len(),
            "wrote raw search results"
        );
        Ok(())
    }
}

/// Take over `display.show` and default `display.offset`, returning the
/// offset pagination starts from. An existing offset is left untouched.
fn prepare_paging(query: &mut Value, increment: usize) -> Result<u64> {
    let map = query
        .as_object_mut()
        .ok_or_else(|| SciDirectError::InvalidQuery("query must be a JSON object".to_string()))?;

    let display = map
        .entry("display")
        .or_insert_with(|| Value::Object(Map::new()));
    let display = display.as_object_mut().ok_or_else(|| {
        SciDirectError::InvalidQuery("`display` must be a JSON object".to_string())
    })?;

    display.insert("show".to_string(), json!(increment));

    match display.get("offset") {
        Some(value) => value.as_u64().ok_or_else(|| {
            SciDirectError::InvalidQuery(
                "`display.offset` must be a non-negative integer".to_string(),
            )
        }),
        None => {
            display.insert("offset".to_string(), json!(0));
            Ok(0)
        }
    }
}

/// Advance `display.offset` on a query already prepared by `prepare_paging`
fn set_offset(query: &mut Value, offset: u64) -> Result<()> {
    query
        .get_mut("display")
        .and_then(Value::as_object_mut)
        .map(|display| {
            display.insert("offset".to_string(), json!(offset));
        })
        .ok_or_else(|| {
            SciDirectError::InvalidQuery("`display` must be a JSON object".to_string())
        })
}
