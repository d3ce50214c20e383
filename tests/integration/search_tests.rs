//! Integration tests for the paginated search engine
//!
//! Call counts are enforced through `Mock::expect`, so every test also
//! verifies how many PUT requests a scenario is allowed to issue.

mod common;

use scidirect_client_rs::{SciDirectError, SciDirectSearch, SearchQuery, SortBy};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{empty_search_response, search_response, test_client, SEARCH_PATH};

#[tokio::test]
async fn test_single_page_search_uses_query_unmodified() {
    let mock_server = MockServer::start().await;
    let query = json!({"pub": "\"Neuron\"", "qs": "mice"});

    // exact body match: single-page mode must not inject display settings
    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_json(query.clone()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_response(3, &["r1", "r2", "r3"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), query).unwrap();
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(3));
    assert_eq!(search.count_retrieved(), 3);

    let piis: Vec<String> = search
        .references()
        .map(|r| r.unwrap().pii().to_string())
        .collect();
    assert_eq!(piis, ["r1", "r2", "r3"]);
}

#[tokio::test]
async fn test_single_page_issues_one_call_regardless_of_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_response(500, &["r1", "r2", "r3"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search =
        SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"})).unwrap();
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(500));
    assert_eq!(search.count_retrieved(), 3);
}

#[tokio::test]
async fn test_exhaustive_pagination_advances_offset_until_total() {
    let mock_server = MockServer::start().await;

    let pages = [
        (0, vec!["r1", "r2"]),
        (2, vec!["r3", "r4"]),
        (4, vec!["r5"]),
    ];
    for (offset, piis) in &pages {
        Mock::given(method("PUT"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(
                json!({"qs": "mice", "display": {"show": 2, "offset": offset}}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response(5, piis)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .exhaustive()
        .with_increment(2)
        .with_max_results(5);
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(5));
    assert_eq!(search.count_retrieved(), 5);

    let piis: Vec<String> = search
        .references()
        .map(|r| r.unwrap().pii().to_string())
        .collect();
    assert_eq!(piis, ["r1", "r2", "r3", "r4", "r5"]);
}

#[tokio::test]
async fn test_zero_matches_issues_no_pagination_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_search_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "xyzzy"}))
        .unwrap()
        .exhaustive();
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(0));
    assert_eq!(search.count_retrieved(), 0);
    assert_eq!(search.references().count(), 0);
}

#[tokio::test]
async fn test_exhaustive_stops_at_max_results_cap() {
    let mock_server = MockServer::start().await;

    for (offset, piis) in [(0, ["r1", "r2"]), (2, ["r3", "r4"])] {
        Mock::given(method("PUT"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(json!({"display": {"offset": offset}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response(10, &piis)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .exhaustive()
        .with_increment(2)
        .with_max_results(4);
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(10));
    assert_eq!(search.count_retrieved(), 4);
}

#[tokio::test]
async fn test_overshooting_page_is_truncated_to_cap() {
    let mock_server = MockServer::start().await;

    for (offset, piis) in [(0, ["r1", "r2"]), (2, ["r3", "r4"])] {
        Mock::given(method("PUT"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(json!({"display": {"offset": offset}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response(10, &piis)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .exhaustive()
        .with_increment(2)
        .with_max_results(3);
    search.execute().await.unwrap();

    // the second page pushed the count past the cap; it never exceeds it
    assert_eq!(search.count_retrieved(), 3);
}

#[tokio::test]
async fn test_exhaustive_respects_preset_offset() {
    let mock_server = MockServer::start().await;

    for (offset, piis) in [(10, ["r11", "r12"]), (12, ["r13"])] {
        Mock::given(method("PUT"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(json!({"display": {"show": 2, "offset": offset}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response(3, &piis)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let query = json!({"qs": "mice", "display": {"offset": 10}});
    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), query)
        .unwrap()
        .exhaustive()
        .with_increment(2);
    search.execute().await.unwrap();

    assert_eq!(search.count_retrieved(), 3);
}

#[tokio::test]
#[traced_test]
async fn test_empty_page_stops_pagination_early() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({"display": {"offset": 0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(6, &["r1", "r2"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({"display": {"offset": 2}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(6, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .exhaustive()
        .with_increment(2);
    search.execute().await.unwrap();

    // partial results stay usable; the shortfall is visible via the counts
    assert_eq!(search.count_retrieved(), 2);
    assert_eq!(search.total_found(), Some(6));
    assert!(logs_contain("stopping pagination early"));
}

#[tokio::test]
async fn test_failure_mid_pagination_preserves_partial_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({"display": {"offset": 0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(6, &["r1", "r2"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({"display": {"offset": 2}})))
        .respond_with(ResponseTemplate::new(429).set_body_string("TOO_MANY_REQUESTS"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .exhaustive()
        .with_increment(2);
    let err = search.execute().await.unwrap_err();

    assert!(matches!(
        err,
        SciDirectError::ApiError { status: 429, .. }
    ));
    assert_eq!(search.count_retrieved(), 2);
    assert_eq!(search.total_found(), Some(6));
    assert_eq!(search.client().last_outcome().unwrap().status_code, 429);
}

#[tokio::test]
async fn test_reexecution_overwrites_previous_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(2, &["a", "b"])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut search =
        SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"})).unwrap();
    search.execute().await.unwrap();
    search.execute().await.unwrap();

    assert_eq!(search.count_retrieved(), 2);
}

#[tokio::test]
async fn test_results_found_as_string_is_accepted() {
    let mock_server = MockServer::start().await;
    let mut response = search_response(0, &["r1", "r2"]);
    response["resultsFound"] = json!("2");

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search =
        SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"})).unwrap();
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(2));
    assert_eq!(search.count_retrieved(), 2);
}

#[tokio::test]
async fn test_missing_results_with_nonzero_total_is_contract_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultsFound": 2})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut search =
        SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"})).unwrap();
    let err = search.execute().await.unwrap_err();

    assert!(matches!(
        err,
        SciDirectError::MissingField { field } if field == "results"
    ));
}

#[tokio::test]
async fn test_dump_writes_raw_records_to_disk() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join("results.json");

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_response(3, &["r1", "r2", "r3"])),
        )
        .mount(&mock_server)
        .await;

    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), json!({"qs": "mice"}))
        .unwrap()
        .with_dump_path(&dump_path);
    search.execute().await.unwrap();

    let dumped: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&dump_path).unwrap()).unwrap();
    assert_eq!(dumped.len(), 3);
    assert_eq!(dumped[0]["pii"], "r1");
}

#[tokio::test]
async fn test_query_builder_payload_is_accepted_by_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SEARCH_PATH))
        .and(body_json(json!({
            "pub": "\"Neuron\"",
            "qs": "mice",
            "display": {"sortBy": "date"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_search_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = SearchQuery::new()
        .journal("\"Neuron\"")
        .query("mice")
        .sort_by(SortBy::Date)
        .build();
    let mut search = SciDirectSearch::new(test_client(&mock_server.uri()), query).unwrap();
    search.execute().await.unwrap();

    assert_eq!(search.total_found(), Some(0));
}
