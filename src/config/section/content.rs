//! `[content]` section configuration.
//!
//! Describes the exported blog tree and the URL namespaces inherited
//! from the old WordPress install.
//!
//! # Example
//!
//! ```toml
//! [content]
//! root = "blog"               # Directory under the workspace, also the URL prefix
//! languages = ["us", "mexico", "latam"]
//! default_language = "us"
//! static_pages = ["faq", "about", "press"]
//! asset_prefixes = ["wp-content", "cdn-cgi", "wp-json", "comments", "feed"]
//! mirror_hosts = ["blog2.roomiapp.com"]
//! ```

use serde::Deserialize;

use crate::config::ConfigError;

/// Content tree and legacy URL namespace settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the exported site, relative to the workspace.
    /// The name doubles as the URL prefix, so `root = "blog"` serves
    /// the tree under `/blog/...`.
    pub root: String,

    /// Language codes used as top-level listing directories.
    pub languages: Vec<String>,

    /// Language whose listing backs the bare `/blog/index.html` URL.
    pub default_language: String,

    /// Top-level pages that live beside the content root rather than
    /// inside it, e.g. `/faq`.
    pub static_pages: Vec<String>,

    /// First path segments served directly from disk without any
    /// rewriting (theme assets, feeds, API exports).
    pub asset_prefixes: Vec<String>,

    /// First path segments that mark a URL as site-internal, so a
    /// trailing post slug may be looked up from any depth below them.
    pub section_prefixes: Vec<String>,

    /// Hostnames of retired mirrors. A request for `/host` is redirected
    /// to the listing instead of being treated as a post slug.
    pub mirror_hosts: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "blog".to_string(),
            languages: string_vec(&["us", "mexico", "latam"]),
            default_language: "us".to_string(),
            static_pages: string_vec(&["faq", "about", "press"]),
            asset_prefixes: string_vec(&["wp-content", "cdn-cgi", "wp-json", "comments", "feed"]),
            section_prefixes: string_vec(&[
                "us",
                "mexico",
                "latam",
                "uncategorized",
                "tag",
                "author",
                "page",
                "our-founder",
                "press",
            ]),
            mirror_hosts: string_vec(&["blog2.roomiapp.com"]),
        }
    }
}

impl ContentConfig {
    /// Check cross-field consistency after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.is_empty() || self.root.contains('/') || self.root.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "content.root must be a bare directory name, got `{}`",
                self.root
            )));
        }

        if self.languages.is_empty() {
            return Err(ConfigError::Validation(
                "content.languages must not be empty".to_string(),
            ));
        }

        if !self.languages.contains(&self.default_language) {
            return Err(ConfigError::Validation(format!(
                "content.default_language `{}` is not listed in content.languages",
                self.default_language
            )));
        }

        Ok(())
    }
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_content_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.content.root, "blog");
        assert_eq!(config.content.languages, ["us", "mexico", "latam"]);
        assert_eq!(config.content.default_language, "us");
        assert_eq!(config.content.static_pages, ["faq", "about", "press"]);
        assert!(
            config
                .content
                .asset_prefixes
                .contains(&"wp-content".to_string())
        );
        assert!(config.content.section_prefixes.contains(&"tag".to_string()));
        assert_eq!(config.content.mirror_hosts, ["blog2.roomiapp.com"]);
    }

    #[test]
    fn test_content_config_custom() {
        let config = test_parse_config(
            r#"[content]
root = "news"
languages = ["en", "fr"]
default_language = "fr"
static_pages = ["imprint"]
asset_prefixes = ["assets"]
section_prefixes = ["en", "fr", "tag"]
mirror_hosts = []"#,
        );

        assert_eq!(config.content.root, "news");
        assert_eq!(config.content.languages, ["en", "fr"]);
        assert_eq!(config.content.default_language, "fr");
        assert_eq!(config.content.static_pages, ["imprint"]);
        assert_eq!(config.content.asset_prefixes, ["assets"]);
        assert!(config.content.mirror_hosts.is_empty());
    }

    #[test]
    fn test_content_config_partial_override() {
        let config = test_parse_config("[content]\nroot = \"posts\"");

        // root is overridden
        assert_eq!(config.content.root, "posts");
        // everything else keeps the defaults
        assert_eq!(config.content.default_language, "us");
        assert_eq!(config.content.languages, ["us", "mexico", "latam"]);
    }

    #[test]
    fn test_content_validate_root_must_be_bare_name() {
        let mut content = ContentConfig::default();
        content.root = "blog/nested".to_string();
        assert!(content.validate().is_err());

        content.root = String::new();
        assert!(content.validate().is_err());

        content.root = "blog".to_string();
        assert!(content.validate().is_ok());
    }

    #[test]
    fn test_content_validate_languages() {
        let mut content = ContentConfig::default();
        content.languages.clear();
        assert!(content.validate().is_err());

        content.languages = vec!["en".to_string()];
        content.default_language = "fr".to_string();
        assert!(content.validate().is_err());

        content.default_language = "en".to_string();
        assert!(content.validate().is_ok());
    }
}
