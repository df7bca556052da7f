#![deny(missing_docs)]

//! # Source Configuration
//!
//! Where the reference document lives and how its sections are recognized.

/// Default site root of the reference documentation.
pub const DEFAULT_SITE_URL: &str = "https://core.telegram.org";

/// Settings for reading the reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Site root, e.g. `https://core.telegram.org`.
    pub site_url: String,
    /// Absolute URL of the API reference page; base for entity links.
    pub api_doc_url: String,
    /// Absolute URL of the changelog page; base for version links.
    pub changelog_url: String,
    /// CSS selector of the element whose children are the document blocks.
    pub container_selector: String,
    /// Anchor name of the section holding release notes.
    pub changelog_category: String,
}

impl SourceConfig {
    /// Derives every URL from a site root.
    pub fn for_site(site_url: &str) -> Self {
        let site_url = site_url.trim_end_matches('/');
        Self {
            site_url: site_url.to_string(),
            api_doc_url: format!("{}/bots/api", site_url),
            changelog_url: format!("{}/bots/api-changelog", site_url),
            container_selector: "#dev_page_content".to_string(),
            changelog_category: "recent-changes".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::for_site(DEFAULT_SITE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = SourceConfig::default();
        assert_eq!(config.api_doc_url, "https://core.telegram.org/bots/api");
        assert_eq!(
            config.changelog_url,
            "https://core.telegram.org/bots/api-changelog"
        );
    }

    #[test]
    fn test_for_site_trims_slash() {
        let config = SourceConfig::for_site("http://localhost:8081/");
        assert_eq!(config.api_doc_url, "http://localhost:8081/bots/api");
    }
}
