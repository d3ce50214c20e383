//! Lazily-resolved references from ScienceDirect search results
//!
//! A search result record carries only partial metadata. Wrapping it as a
//! [`SciDirectReference`] exposes those fields immediately and defers the
//! expensive per-document calls: full detail metadata and the PDF bytes
//! are each fetched on first access and cached for the life of the
//! reference. Failed fetches are not cached, so a later access retries.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client::SciDirectClient;
use crate::error::{Result, SciDirectError};
use crate::responses::field_as_string;

/// Sentinel for documents the remote has not yet assigned a PMID
pub const NO_PMID: &str = "no PMID";
/// Sentinel for a detail payload without a publication type
pub const NO_PUB_TYPE: &str = "no pubType";
/// Sentinel for a detail payload without an abstract
pub const NO_ABSTRACT: &str = "no abstract";
/// Sentinel for a detail payload without a volume
pub const NO_VOLUME: &str = "no volume";

/// Keys every search result record is guaranteed to carry
const REQUIRED_FIELDS: [&str; 6] = [
    "pii",
    "doi",
    "sourceTitle",
    "title",
    "loadDate",
    "publicationDate",
];

const DETAIL_WRAPPER_KEY: &str = "full-text-retrieval-response";

/// Detail metadata fetched from the per-document article endpoint
///
/// Fields the payload omits are substituted with sentinels; the upstream
/// payload shape is not contractually guaranteed beyond the wrapper key.
#[derive(Debug, Clone)]
pub struct ArticleDetails {
    pmid: String,
    pub_type: String,
    abstract_text: String,
    volume: String,
    raw: Value,
}

impl ArticleDetails {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wrapper = payload
            .get(DETAIL_WRAPPER_KEY)
            .ok_or_else(|| SciDirectError::MissingField {
                field: DETAIL_WRAPPER_KEY.to_string(),
            })?;

        let coredata = wrapper.get("coredata");
        let pick = |section: Option<&Value>, key: &str, sentinel: &str| {
            section
                .and_then(|s| s.get(key))
                .map(field_as_string)
                .unwrap_or_else(|| sentinel.to_string())
        };

        Ok(Self {
            pmid: pick(Some(wrapper), "pubmed-id", NO_PMID),
            pub_type: pick(coredata, "pubType", NO_PUB_TYPE),
            abstract_text: pick(coredata, "dc:description", NO_ABSTRACT),
            volume: pick(coredata, "prism:volume", NO_VOLUME),
            raw: wrapper.clone(),
        })
    }

    /// PubMed ID, or [`NO_PMID`] if the document has none yet
    pub fn pmid(&self) -> &str {
        &self.pmid
    }

    /// Whether the remote has assigned this document a PMID
    pub fn has_pmid(&self) -> bool {
        self.pmid != NO_PMID
    }

    /// Publication type, e.g. "Full length article"
    pub fn pub_type(&self) -> &str {
        &self.pub_type
    }

    /// Abstract text
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    /// Journal volume
    pub fn volume(&self) -> &str {
        &self.volume
    }

    /// The full detail payload as returned by the API
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// One search result as a metadata object
///
/// Construction validates that the record carries every guaranteed key.
/// The eager accessors never touch the network; the detail and PDF
/// accessors each issue at most one API call per reference instance.
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
///     let mut search = SciDirectSearch::new(client, query)?;
///     search.execute().await?;
///
///     for reference in search.references() {
///         let mut reference = reference?;
///         println!("{} ({})", reference.title(), reference.journal());
///         // first detail accessor triggers one API call, then cached
///         println!("  PMID: {}", reference.pmid().await?);
///         println!("  volume: {}", reference.volume().await?);
///     }
///     Ok(())
/// }
/// ```
pub struct SciDirectReference {
    client: SciDirectClient,
    record: Map<String, Value>,
    pii: String,
    doi: String,
    journal: String,
    title: String,
    load_date: String,
    publication_date: String,
    volume_issue: Option<String>,
    details: Option<ArticleDetails>,
    pdf: Option<Vec<u8>>,
}

impl SciDirectReference {
    /// Wrap one raw search result record
    ///
    /// Fails with [`SciDirectError::MissingField`] naming the first
    /// guaranteed key the record does not carry.
    pub fn new(client: SciDirectClient, record: Map<String, Value>) -> Result<Self> {
        for field in REQUIRED_FIELDS {
            if !record.contains_key(field) {
                return Err(SciDirectError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        let unpack = |field: &str| field_as_string(&record[field]);

        Ok(Self {
            pii: unpack("pii"),
            doi: unpack("doi"),
            journal: unpack("sourceTitle"),
            title: unpack("title"),
            load_date: unpack("loadDate"),
            publication_date: unpack("publicationDate"),
            volume_issue: record.get("volumeIssue").map(field_as_string),
            client,
            record,
            details: None,
            pdf: None,
        })
    }

    /// The document's stable ScienceDirect identifier
    pub fn pii(&self) -> &str {
        &self.pii
    }

    pub fn doi(&self) -> &str {
        &self.doi
    }

    /// Journal name (`sourceTitle` in the raw record)
    pub fn journal(&self) -> &str {
        &self.journal
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the document was loaded into ScienceDirect
    pub fn load_date(&self) -> &str {
        &self.load_date
    }

    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    /// Volume/issue label, when the record carries one
    pub fn volume_issue(&self) -> Option<&str> {
        self.volume_issue.as_deref()
    }

    /// The raw search result record this reference wraps
    pub fn raw_record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// The shared transport client
    pub fn client(&self) -> &SciDirectClient {
        &self.client
    }

    /// PubMed ID from the detail metadata, or [`NO_PMID`]
    pub async fn pmid(&mut self) -> Result<String> {
        Ok(self.details().await?.pmid().to_string())
    }

    /// Publication type from the detail metadata
    pub async fn pub_type(&mut self) -> Result<String> {
        Ok(self.details().await?.pub_type().to_string())
    }

    /// Abstract from the detail metadata
    pub async fn abstract_text(&mut self) -> Result<String> {
        Ok(self.details().await?.abstract_text().to_string())
    }

    /// Journal volume from the detail metadata
    pub async fn volume(&mut self) -> Result<String> {
        Ok(self.details().await?.volume().to_string())
    }

    /// The full detail metadata, fetching it on first access
    ///
    /// All detail accessors share this cache: the first call issues one
    /// GET against the article endpoint, every later call is a cache hit.
    pub async fn details(&mut self) -> Result<&ArticleDetails> {
        if self.details.is_none() {
            let url = self.client.article_url(&self.pii);
            debug!(pii = %self.pii, "fetching reference details");
            let payload = self.client.get_json(&url).await?;
            self.details = Some(ArticleDetails::from_payload(payload)?);
        }
        Ok(self.details.as_ref().expect("details populated above"))
    }

    /// The document's PDF bytes, fetching them on first access
    pub async fn pdf(&mut self) -> Result<&[u8]> {
        if self.pdf.is_none() {
            let url = self.client.article_url(&self.pii);
            debug!(pii = %self.pii, "fetching reference PDF");
            let bytes = self.client.get_pdf(&url).await?;
            info!(pii = %self.pii, bytes = bytes.len(), "PDF retrieved");
            self.pdf = Some(bytes);
        }
        Ok(self.pdf.as_deref().expect("pdf populated above"))
    }
}
