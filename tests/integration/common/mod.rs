//! Shared helpers for the wiremock-backed integration tests
#![allow(dead_code)]

use std::time::Duration;

use scidirect_client_rs::{ClientConfig, SciDirectClient};
use serde_json::{json, Map, Value};

/// Path of the PUT search endpoint relative to the base URL
pub const SEARCH_PATH: &str = "/content/search/sciencedirect";

/// Client pointed at a mock server, with throttling disabled so test
/// runtime stays flat
pub fn test_client(base_url: &str) -> SciDirectClient {
    SciDirectClient::with_config(
        ClientConfig::new("test-api-key")
            .with_base_url(base_url)
            .with_min_interval(Duration::ZERO),
    )
}

/// A search result record carrying every guaranteed key
pub fn sample_record(pii: &str) -> Value {
    json!({
        "pii": pii,
        "doi": format!("10.1016/j.test.{pii}"),
        "sourceTitle": "Neuron",
        "title": format!("Article {pii}"),
        "loadDate": "2021-04-03T00:00:00.000Z",
        "publicationDate": "2021-05-01",
    })
}

/// Same record as an object map, as `SciDirectReference::new` takes it
pub fn sample_record_map(pii: &str) -> Map<String, Value> {
    sample_record(pii)
        .as_object()
        .cloned()
        .expect("sample record is an object")
}

/// Search response page listing the given records
pub fn search_response(total: u64, piis: &[&str]) -> Value {
    json!({
        "resultsFound": total,
        "results": piis.iter().map(|pii| sample_record(pii)).collect::<Vec<_>>(),
    })
}

/// Search response for a query with no matches; the API omits `results`
pub fn empty_search_response() -> Value {
    json!({"resultsFound": 0})
}

/// Article detail payload, with or without an assigned PMID
pub fn detail_response(pmid: Option<&str>) -> Value {
    let mut wrapper = json!({
        "coredata": {
            "pubType": "Full length article",
            "dc:description": "An abstract about mice.",
            "prism:volume": "109",
        }
    });
    if let Some(pmid) = pmid {
        wrapper["pubmed-id"] = json!(pmid);
    }
    json!({"full-text-retrieval-response": wrapper})
}
