//! End-to-end tests for identifier listing (`--ids`)
//!
//! Covers query construction on the wire, the count-then-fetch exchange,
//! retry on transient failures and Entrez error reporting.

mod common;

use common::{esearch_xml, genetable};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_ids_prints_one_per_line() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param_is_missing("retmax"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(3, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "nuccore"))
        .and(query_param("retmax", "3"))
        .and(query_param("term", "Homo sapiens[Organism] AND (COI[All Fields] OR COX[All Fields])"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_xml(3, &["2462554541", "2462554539", "1798174254"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .arg("Homo sapiens")
        .arg("--markers")
        .arg("COI,COX")
        .arg("--ids")
        .assert()
        .success()
        .stdout("2462554541\n2462554539\n1798174254\n");
}

#[tokio::test]
async fn test_ids_length_bounds_need_both() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", "Danio[Organism]"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(0, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio", "--lmin", "500", "--ids"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No records matched"));
}

#[tokio::test]
async fn test_ids_length_bounds_in_query() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", "Danio[Organism] AND (500[SLEN] :900[SLEN])"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(0, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio", "--lmin", "500", "--lmax", "900", "--ids"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_ids_retries_transient_failure() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param_is_missing("retmax"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(1, &[])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(1, &["42"])))
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio rerio", "--ids"])
        .assert()
        .success()
        .stdout("42\n");
}

#[tokio::test]
async fn test_ids_persistent_outage_fails() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio rerio", "--ids"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Giving up after 3 attempts"));
}

#[tokio::test]
async fn test_ids_entrez_error_is_reported() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<eSearchResult><ERROR>Invalid db name specified: nucore</ERROR></eSearchResult>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio rerio", "--db", "nucore", "--ids"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid db name"));
}

#[test]
fn test_missing_term_is_usage_error() {
    let mut cmd = assert_cmd::Command::cargo_bin("genetable").unwrap();
    cmd.assert().failure().code(2);
}

#[test]
fn test_zero_cache_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cmd = assert_cmd::Command::cargo_bin("genetable").unwrap();
    cmd.current_dir(dir.path())
        .args(["Danio", "--cache", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Batch size"));
}
