#![deny(missing_docs)]

//! # Page Loading
//!
//! Reads the reference page from disk or, with the `client` feature, over HTTP.

use crate::error::{CliError, CliResult};
use botapi_core::SourceConfig;
use std::fs;

/// Loads the page named by `source`; the official page when absent.
pub fn load(source: Option<&str>, config: &SourceConfig) -> CliResult<String> {
    match source {
        None => download(&config.api_doc_url),
        Some(url) if is_remote(url) => download(url),
        Some(path) => {
            tracing::debug!(path, "reading reference page");
            Ok(fs::read_to_string(path)?)
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(feature = "client")]
fn download(url: &str) -> CliResult<String> {
    tracing::info!(url, "downloading reference page");
    ureq::get(url)
        .call()
        .and_then(|mut response| response.body_mut().read_to_string())
        .map_err(|e| CliError::General(format!("failed to download {}: {}", url, e)))
}

#[cfg(not(feature = "client"))]
fn download(url: &str) -> CliResult<String> {
    Err(CliError::General(format!(
        "cannot download {}: built without the `client` feature",
        url
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://core.telegram.org/bots/api"));
        assert!(is_remote("http://localhost:8081/bots/api"));
        assert!(!is_remote("pages/api.html"));
    }

    #[test]
    fn test_load_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("api.html");
        fs::write(&page, "<div id=\"dev_page_content\"></div>").unwrap();

        let html = load(page.to_str(), &SourceConfig::default()).unwrap();
        assert!(html.contains("dev_page_content"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load(Some("does/not/exist.html"), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
