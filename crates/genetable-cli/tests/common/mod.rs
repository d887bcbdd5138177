//! Shared helpers for end-to-end tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use wiremock::MockServer;

/// esearch body reporting `count` with the given identifiers
pub fn esearch_xml(count: u64, ids: &[&str]) -> String {
    let ids: String = ids.iter().map(|id| format!("<Id>{}</Id>", id)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<eSearchResult><Count>{}</Count><RetMax>{}</RetMax><RetStart>0</RetStart><IdList>{}</IdList></eSearchResult>",
        count,
        ids.len(),
        ids
    )
}

/// `genetable` pointed at the mock server, isolated from the caller's environment
pub fn genetable(server: &MockServer, workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("genetable").unwrap();
    cmd.current_dir(workdir)
        .env_remove("NCBI_API_KEY")
        .env_remove("NCBI_EMAIL")
        .env_remove("ENTREZ_TIMEOUT_SECS")
        .env_remove("ENTREZ_MAX_RETRIES")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env("ENTREZ_BACKOFF_MS", "1")
        .env("ENTREZ_BASE_URL", server.uri());
    cmd
}
