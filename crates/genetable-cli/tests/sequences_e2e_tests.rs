//! End-to-end tests for record download
//!
//! Covers batched efetch streaming to stdout and the species-level
//! GenBank filter (`--ite`).

mod common;

use common::{esearch_xml, genetable};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

async fn mount_search(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param_is_missing("retmax"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(ids.len() as u64, &[])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", ids.len().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(ids.len() as u64, ids)))
        .mount(server)
        .await;
}

fn genbank(accession: &str, organism: &str) -> String {
    [
        format!("LOCUS       {}               658 bp    DNA     linear   VRT 01-JAN-2020", accession),
        format!("DEFINITION  {} COI gene, partial cds.", organism),
        format!("ACCESSION   {}", accession),
        format!("SOURCE      {}", organism),
        format!("  ORGANISM  {}", organism),
        "            Eukaryota; Metazoa; Chordata.".to_string(),
        "ORIGIN      ".to_string(),
        "        1 acgtacgtac".to_string(),
        "//".to_string(),
    ]
    .join("\n")
        + "\n"
}

#[tokio::test]
async fn test_fasta_streamed_in_batches() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_search(&mock_server, &["1", "2", "3", "4", "5"]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2"))
        .and(query_param("rettype", "fasta"))
        .respond_with(ResponseTemplate::new(200).set_body_string(">seq1\nACGT\n>seq2\nGGCC\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "3,4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(">seq3\nTTTT\n>seq4\nAAAA\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(">seq5\nCCCC\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio rerio", "--cache", "2"])
        .assert()
        .success()
        .stdout(">seq1\nACGT\n>seq2\nGGCC\n>seq3\nTTTT\n>seq4\nAAAA\n>seq5\nCCCC\n");
}

#[tokio::test]
async fn test_no_matches_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_search(&mock_server, &[]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .arg("Nonexistent organism")
        .assert()
        .success()
        .stdout("");
}

#[tokio::test]
async fn test_failed_batch_aborts_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_search(&mock_server, &["1", "2"]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .arg("Danio rerio")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("batch 1 of 1"));
}

#[tokio::test]
async fn test_species_filter_writes_output_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_search(&mock_server, &["1", "2", "3"]).await;

    let page = format!(
        "{}\n{}\n{}\n",
        genbank("MN100001", "Danio rerio"),
        genbank("MN100002", "Danio sp."),
        genbank("MN100003", "Danio aesculapii")
    );

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "gb"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio", "--type", "gb", "--ite", "--out", "danio.gb"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Wrote 2 of 3 records"));

    let written = fs::read_to_string(dir.path().join("danio.gb")).unwrap();
    assert!(written.contains("MN100001"));
    assert!(written.contains("MN100003"));
    assert!(!written.contains("MN100002"));
    assert_eq!(written.matches("\n//").count(), 2);
}

#[tokio::test]
async fn test_species_filter_suggests_broader_term() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_search(&mock_server, &["1"]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(genbank("MN1", "Danio sp.")))
        .mount(&mock_server)
        .await;

    genetable(&mock_server, dir.path())
        .args(["Danio", "--type", "gb", "--ite"])
        .assert()
        .success()
        .stderr(predicate::str::contains("try searching a family name instead of this genus"))
        .stderr(predicate::str::contains("--group").not());

    assert!(dir.path().join("output.gb").exists());
}

#[test]
fn test_species_filter_requires_genbank() {
    let dir = TempDir::new().unwrap();
    let mut cmd = assert_cmd::Command::cargo_bin("genetable").unwrap();
    cmd.current_dir(dir.path())
        .args(["Danio", "--ite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--type gb"));
}
