//! End-to-end pipeline tests against mocked PubMed and PMC services

mod common;

use std::fs;

use common::{
    IDCONV_PATH, OA_PATH, build_tgz, idconv_response, mock_config, oa_not_open_access,
    oa_response,
};
use pmc_corpus::{CorpusError, CorpusWriter, DocumentOutcome, Pipeline, SearchQuery};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTRO_NXML: &str = "<article><body><sec><title>Introduction</title><p>Chaperones fold <xref>1</xref>proteins.</p></sec><sec><title>Methods</title><p>Skipped.</p></sec></body></article>";
const DISCUSSION_NXML: &str = "<article><body><sec><title>Discussion</title><p>Aggregates persist.</p><p>Autophagy helps.</p></sec></body></article>";
const METHODS_ONLY_NXML: &str = "<article><body><sec><title>Methods</title><p>Protocol.</p></sec></body></article>";

fn proteostasis_query() -> SearchQuery {
    SearchQuery::new()
        .title_keyword("proteostasis")
        .published_between((2021, 1, 1), Some(3000))
}

fn create_pipeline(mock_server: &MockServer) -> Pipeline {
    Pipeline::new(mock_config(mock_server)).expect("pipeline should build")
}

async fn mount_search(mock_server: &MockServer, pages: &[&str]) {
    for (index, body) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(*body))
            .mount(mock_server)
            .await;
    }
}

async fn mount_idconv(mock_server: &MockServer, records: &[(&str, Option<&str>)]) {
    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(idconv_response(records)))
        .expect(1)
        .mount(mock_server)
        .await;
}

/// Serve an OA record and its package for `pmcid`
async fn mount_article(mock_server: &MockServer, pmcid: &str, nxml: &str) {
    let package_path = format!("/pub/pmc/oa_package/{pmcid}.tar.gz");
    let href = format!("{}{package_path}", mock_server.uri());

    Mock::given(method("GET"))
        .and(path(OA_PATH))
        .and(query_param("id", pmcid))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(oa_response(pmcid, &[("tgz", href.as_str())])),
        )
        .mount(mock_server)
        .await;

    let member = format!("{pmcid}/{pmcid}.nxml");
    Mock::given(method("GET"))
        .and(path(package_path))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(build_tgz(&[(member.as_str(), nxml)])),
        )
        .mount(mock_server)
        .await;
}

async fn mount_broken_package(mock_server: &MockServer, pmcid: &str) {
    let package_path = format!("/pub/pmc/oa_package/{pmcid}.tar.gz");
    let href = format!("{}{package_path}", mock_server.uri());

    Mock::given(method("GET"))
        .and(path(OA_PATH))
        .and(query_param("id", pmcid))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(oa_response(pmcid, &[("tgz", href.as_str())])),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(package_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_full_run_writes_one_line_per_document() {
    let mock_server = MockServer::start().await;

    mount_search(&mock_server, &["300\n200\n100\n", ""]).await;
    mount_idconv(
        &mock_server,
        &[("300", Some("PMC3")), ("200", None), ("100", Some("PMC1"))],
    )
    .await;
    mount_article(&mock_server, "PMC3", INTRO_NXML).await;
    mount_article(&mock_server, "PMC1", DISCUSSION_NXML).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("corpus.txt");
    let mut writer = CorpusWriter::create(&output).unwrap();

    let mut seen = Vec::new();
    let summary = create_pipeline(&mock_server)
        .run(&proteostasis_query(), &mut writer, |pmcid, outcome| {
            seen.push((pmcid.to_string(), outcome.clone()));
        })
        .await
        .expect("run should succeed");
    assert_eq!(writer.finish().unwrap(), 2);

    assert_eq!(summary.pmids, 3);
    assert_eq!(summary.pmcids, 2);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(
        seen,
        vec![
            ("PMC3".to_string(), DocumentOutcome::Written { paragraphs: 2 }),
            ("PMC1".to_string(), DocumentOutcome::Written { paragraphs: 3 }),
        ]
    );

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(
        contents,
        "Introduction\n\nChaperones fold proteins.\n\
         Discussion\n\nAggregates persist.\n\nAutophagy helps.\n"
    );
}

#[tokio::test]
#[traced_test]
async fn test_failed_and_unavailable_articles_are_skipped() {
    let mock_server = MockServer::start().await;

    mount_broken_package(&mock_server, "PMC10").await;
    Mock::given(method("GET"))
        .and(path(OA_PATH))
        .and(query_param("id", "PMC20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(oa_not_open_access("PMC20")))
        .mount(&mock_server)
        .await;
    mount_article(&mock_server, "PMC30", METHODS_ONLY_NXML).await;
    mount_article(&mock_server, "PMC40", DISCUSSION_NXML).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("corpus.txt");
    let mut writer = CorpusWriter::create(&output).unwrap();

    let pmcids: Vec<String> = ["PMC10", "PMC20", "PMC30", "PMC40"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut outcomes = Vec::new();
    let summary = create_pipeline(&mock_server)
        .process_pmcids(&pmcids, &mut writer, |_, outcome| outcomes.push(outcome.clone()))
        .await
        .expect("failures should be skipped");
    writer.finish().unwrap();

    assert!(matches!(outcomes[0], DocumentOutcome::Failed(_)));
    assert_eq!(outcomes[1], DocumentOutcome::Unavailable);
    assert_eq!(outcomes[2], DocumentOutcome::Empty);
    assert_eq!(outcomes[3], DocumentOutcome::Written { paragraphs: 3 });

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.unavailable, 1);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.written, 1);

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(
        contents,
        "Discussion\n\nAggregates persist.\n\nAutophagy helps.\n"
    );
}

#[tokio::test]
#[traced_test]
async fn test_fail_fast_aborts_on_first_failure() {
    let mock_server = MockServer::start().await;

    mount_broken_package(&mock_server, "PMC10").await;
    mount_article(&mock_server, "PMC40", DISCUSSION_NXML).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("corpus.txt");
    let mut writer = CorpusWriter::create(&output).unwrap();

    let pmcids = vec!["PMC10".to_string(), "PMC40".to_string()];
    let result = create_pipeline(&mock_server)
        .with_fail_fast(true)
        .process_pmcids(&pmcids, &mut writer, |_, _| {})
        .await;

    match result {
        Err(CorpusError::ApiError { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected ApiError, got {other:?}"),
    }
    assert_eq!(writer.documents(), 0);
}

#[tokio::test]
#[traced_test]
async fn test_search_failure_aborts_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut writer = CorpusWriter::create(dir.path().join("corpus.txt")).unwrap();

    let result = create_pipeline(&mock_server)
        .run(&proteostasis_query(), &mut writer, |_, _| {})
        .await;

    assert!(matches!(result, Err(CorpusError::ApiError { status: 502, .. })));
}

#[tokio::test]
#[traced_test]
async fn test_no_hits_writes_nothing() {
    let mock_server = MockServer::start().await;

    mount_search(&mock_server, &[""]).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("corpus.txt");
    let mut writer = CorpusWriter::create(&output).unwrap();

    let summary = create_pipeline(&mock_server)
        .run(&proteostasis_query(), &mut writer, |_, _| {})
        .await
        .unwrap();
    writer.finish().unwrap();

    assert_eq!(summary.pmids, 0);
    assert_eq!(summary.pmcids, 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
    // no PMIDs means no conversion request
    assert!(
        mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .all(|request| request.url.path() == "/")
    );
}
