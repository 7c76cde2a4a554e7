//! Integration tests for PubMed search pagination using mocked HTTP responses

mod common;

use common::mock_config;
use pmc_corpus::{CorpusError, PubMedClient, SearchQuery};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    PubMedClient::with_config(mock_config(mock_server)).expect("client should build")
}

fn proteostasis_query() -> SearchQuery {
    SearchQuery::new()
        .title_keyword("proteostasis")
        .published_between((2021, 1, 1), Some(3000))
}

async fn mount_page(mock_server: &MockServer, page: usize, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("format", "pmid"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_pagination_stops_at_first_empty_page() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, "38000003\n38000002\n38000001\n").await;
    mount_page(&mock_server, 2, "37000002\n37000001\n").await;
    mount_page(&mock_server, 3, "").await;

    let client = create_mock_client(&mock_server);
    let pmids = client
        .search_all_pmids(&proteostasis_query())
        .await
        .expect("search should succeed");

    assert_eq!(
        pmids,
        vec!["38000003", "38000002", "38000001", "37000002", "37000001"]
    );
}

#[tokio::test]
#[traced_test]
async fn test_search_sends_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("format", "pmid"))
        .and(query_param("sort", "date"))
        .and(query_param("size", "100"))
        .and(query_param(
            "term",
            "(proteostasis[Title]) AND (\"2021/01/01\"[Publication Date] : \"3000\"[Publication Date])",
        ))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let pmids = client
        .search_all_pmids(&proteostasis_query())
        .await
        .expect("search should succeed");

    assert!(pmids.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_page_with_only_non_numeric_lines_ends_pagination() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, "36000001\n").await;
    mount_page(
        &mock_server,
        2,
        "<!DOCTYPE html>\n<html><body>No results</body></html>\n",
    )
    .await;

    let client = create_mock_client(&mock_server);
    let pmids = client
        .search_all_pmids(&proteostasis_query())
        .await
        .expect("search should succeed");

    assert_eq!(pmids, vec!["36000001"]);
}

#[tokio::test]
#[traced_test]
async fn test_repeated_pmids_are_kept_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, "35000002\n35000001\n").await;
    mount_page(&mock_server, 2, "35000001\n35000000\n").await;
    // a page made only of repeats still counts as non-empty
    mount_page(&mock_server, 3, "35000000\n").await;
    mount_page(&mock_server, 4, "\n").await;

    let client = create_mock_client(&mock_server);
    let pmids = client
        .search_all_pmids(&proteostasis_query())
        .await
        .expect("search should succeed");

    assert_eq!(pmids, vec!["35000002", "35000001", "35000000"]);
}

#[tokio::test]
#[traced_test]
async fn test_server_error_aborts_search() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, "34000001\n").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.search_all_pmids(&proteostasis_query()).await;

    match result {
        Err(CorpusError::ApiError { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_small_page_size_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        PubMedClient::with_config(mock_config(&mock_server).with_page_size(2)).unwrap();
    let pmids = client.search_all_pmids(&proteostasis_query()).await.unwrap();
    assert!(pmids.is_empty());
}
