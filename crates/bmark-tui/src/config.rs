//! Palette configuration.
//!
//! Loaded from `~/.config/bmark/config.json`; every field has a default so a
//! missing or malformed file degrades to stock behavior.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Web-search URL template; `%s` is replaced with the encoded query.
    pub search_template: String,

    /// Command used to open URLs.
    pub opener: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_template: "https://www.google.com/search?q=%s".to_string(),
            opener: "xdg-open".to_string(),
        }
    }
}

impl Config {
    /// Load from the user config directory, falling back to defaults.
    #[must_use]
    pub fn load() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("", "", "bmark") else {
            return Self::default();
        };
        Self::load_from(&dirs.config_dir().join("config.json"))
    }

    /// Load from an explicit path, falling back to defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Build the web-search URL for a literal query string.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        if self.search_template.contains("%s") {
            self.search_template.replacen("%s", &encoded, 1)
        } else {
            format!("{}{encoded}", self.search_template)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = Config::load_from(Path::new("/nonexistent/config.json"));
        assert_eq!(config.opener, "xdg-open");
        assert!(config.search_template.contains("%s"));
    }

    #[test]
    fn test_defaults_when_file_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{nope").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.opener, "xdg-open");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"searchTemplate": "https://duckduckgo.com/html/?q=%s"}"#,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert!(config.search_template.contains("duckduckgo"));
        assert_eq!(config.opener, "xdg-open");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let config = Config::default();

        let url = config.search_url("rust async book");
        assert_eq!(url, "https://www.google.com/search?q=rust+async+book");

        let url = config.search_url("a&b=c");
        assert!(url.ends_with("q=a%26b%3Dc"));
    }

    #[test]
    fn test_search_url_without_placeholder_appends() {
        let config = Config {
            search_template: "https://example.com/find?q=".to_string(),
            ..Config::default()
        };

        assert_eq!(
            config.search_url("foo"),
            "https://example.com/find?q=foo"
        );
    }
}
