//! Configuration options for a crawl run.
//!
//! The `Options` struct replaces the UI checkboxes of a desktop crawler with
//! plain typed fields. Every field has a documented default, so callers only
//! set what they care about.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Configuration options for crawling and extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings. Options can also be loaded from a JSON file where
/// missing keys fall back to their defaults.
///
/// # Example
///
/// ```rust
/// use ee_catalog_crawler::Options;
///
/// let options = Options {
///     follow_links: false,
///     minimal_mode: true,
///     ..Options::default()
/// };
/// assert_eq!(options.max_follow_links, 50);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Follow candidate links discovered on the start page.
    ///
    /// When false only the start page itself is extracted.
    ///
    /// Default: `true`
    pub follow_links: bool,

    /// Run only the cheap extractors (title, description, temporal, provider).
    ///
    /// Skips bands, citations, thumbnails and enrichment.
    ///
    /// Default: `false`
    pub minimal_mode: bool,

    /// Maximum number of links fetched during one run, all types included.
    ///
    /// Default: `50`
    pub max_follow_links: usize,

    /// Maximum number of `dataset_detail` links fetched during one run.
    ///
    /// Default: `25`
    pub max_detail_links: usize,

    /// Pause between two fetches. Read from config files as milliseconds.
    ///
    /// Default: `500ms`
    #[serde(deserialize_with = "duration_from_millis")]
    pub request_delay: Duration,

    /// Discover links on fetched catalog/tag pages and queue them as well.
    ///
    /// Default: `true`
    pub follow_nested_catalogs: bool,

    /// Collect `<img>` thumbnails into records.
    ///
    /// Default: `true`
    pub include_thumbnails: bool,

    /// Run the enrichment strategies (theme classification, gazetteer).
    ///
    /// Default: `true`
    pub enrich: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            follow_links: true,
            minimal_mode: false,
            max_follow_links: 50,
            max_detail_links: 25,
            request_delay: Duration::from_millis(500),
            follow_nested_catalogs: true,
            include_thumbnails: true,
            enrich: true,
        }
    }
}

impl Options {
    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load options from a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();

        assert!(opts.follow_links);
        assert!(!opts.minimal_mode);
        assert_eq!(opts.max_follow_links, 50);
        assert_eq!(opts.max_detail_links, 25);
        assert_eq!(opts.request_delay, Duration::from_millis(500));
        assert!(opts.follow_nested_catalogs);
        assert!(opts.include_thumbnails);
        assert!(opts.enrich);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts = Options::from_json_str(r#"{"minimal_mode": true, "request_delay": 0}"#)
            .unwrap_or_default();

        assert!(opts.minimal_mode);
        assert_eq!(opts.request_delay, Duration::ZERO);
        assert!(opts.follow_links);
        assert_eq!(opts.max_detail_links, 25);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Options::from_json_str("{ not json").err();
        assert!(matches!(err, Some(Error::ConfigError(_))));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = Options::from_json_str(r#"{"max_follow_links": "many"}"#).err();
        assert!(matches!(err, Some(Error::ConfigError(_))));
    }

    #[test]
    fn test_struct_update_syntax() {
        let opts = Options {
            follow_links: false,
            max_follow_links: 5,
            ..Options::default()
        };

        assert!(!opts.follow_links);
        assert_eq!(opts.max_follow_links, 5);
        assert!(opts.enrich);
    }
}
