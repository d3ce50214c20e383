//! # ScienceDirect Client
//!
//! A Rust client library for the Elsevier ScienceDirect APIs: full-text
//! search via the PUT interface, and per-document metadata and PDF
//! retrieval.
//!
//! ## Features
//!
//! - **Throttled transport**: one shared client enforces a minimum interval
//!   between requests and attaches the API key / institutional token headers
//! - **Paginated search**: single-page or exhaustive retrieval with a page
//!   increment and an overall result cap
//! - **Lazy references**: search results expose their eager fields
//!   immediately and fetch detail metadata and PDF bytes on first access,
//!   caching them for the life of the reference
//! - **Async support**: built on tokio and reqwest
//! - **Error handling**: typed errors distinguish bad arguments, transport
//!   failures, non-200 API responses, and contract mismatches
//!
//! ## Quick Start
//!
//! ```no_run
//! use scidirect_client_rs::{ClientConfig, SciDirectClient, SciDirectSearch, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("your_api_key").with_inst_token("your_token");
//!     let client = SciDirectClient::with_config(config);
//!
//!     let query = SearchQuery::new()
//!         .journal("\"Neuron\"")
//!         .query("mice")
//!         .build();
//!
//!     let mut search = SciDirectSearch::new(client, query)?.exhaustive();
//!     search.execute().await?;
//!     println!(
//!         "retrieved {} of {:?} matches",
//!         search.count_retrieved(),
//!         search.total_found()
//!     );
//!
//!     for reference in search.references() {
//!         let mut reference = reference?;
//!         println!("{}: {}", reference.pii(), reference.title());
//!
//!         // Each of these issues at most one extra API call per reference
//!         if reference.details().await?.has_pmid() {
//!             let pdf_len = reference.pdf().await?.len();
//!             println!("  {} PDF bytes for PMID {}", pdf_len, reference.pmid().await?);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod rate_limit;
pub mod reference;
mod responses;
pub mod search;

// Re-export main types for convenience
pub use client::{ContentType, RequestOutcome, SciDirectClient};
pub use config::ClientConfig;
pub use error::{Result, SciDirectError};
pub use query::{DisplayOptions, SearchQuery, SortBy};
pub use rate_limit::RequestThrottle;
pub use reference::{
    ArticleDetails, SciDirectReference, NO_ABSTRACT, NO_PMID, NO_PUB_TYPE, NO_VOLUME,
};
pub use search::{PaginationMode, SciDirectSearch};
