//! Page fetchers.
//!
//! The crawler depends only on [`PageFetcher`]. [`FileFetcher`] serves saved
//! catalog pages from disk, mapping site URLs onto a directory;
//! [`HttpFetcher`] is a blocking `reqwest` client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::encoding;
use crate::error::{Error, Result};
use crate::url_utils;

/// User agent sent by [`HttpFetcher`].
pub const USER_AGENT: &str = concat!("ee-catalog-crawler/", env!("CARGO_PKG_VERSION"));

/// Source of page HTML.
pub trait PageFetcher {
    /// Fetch `url` and return its HTML as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchError`] when the page cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Reads pages from a local directory.
///
/// `file://` URLs and plain paths are read as-is. For http(s) URLs the URL
/// path is looked up under the root directory, trying the path itself, the
/// path with `.html`, `index.html` inside it, and finally the last path
/// segment with `.html` directly under the root. Aliases map one exact URL
/// to a file and are checked first.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
    aliases: Vec<(String, PathBuf)>,
}

impl FileFetcher {
    /// Fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            aliases: Vec::new(),
        }
    }

    /// Serve `path` whenever `url` is requested.
    #[must_use]
    pub fn with_alias(mut self, url: &str, path: impl Into<PathBuf>) -> Self {
        self.aliases.push((url_utils::normalize_url(url), path.into()));
        self
    }

    /// Root directory for site URLs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files for `url`, in lookup order.
    #[must_use]
    pub fn candidates(&self, url: &str) -> Vec<PathBuf> {
        let key = url_utils::normalize_url(url);
        if let Some((_, path)) = self.aliases.iter().find(|(alias, _)| *alias == key) {
            return vec![path.clone()];
        }

        let Ok(parsed) = Url::parse(url) else {
            let path = Path::new(url);
            return vec![if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            }];
        };

        if parsed.scheme() == "file" {
            return parsed.to_file_path().map(|p| vec![p]).unwrap_or_default();
        }

        let relative = parsed.path().trim_matches('/');
        if relative.is_empty() {
            return vec![self.root.join("index.html")];
        }

        let mut candidates = vec![
            self.root.join(relative),
            self.root.join(format!("{relative}.html")),
            self.root.join(relative).join("index.html"),
        ];
        if let Some(last) = relative.rsplit('/').next() {
            candidates.push(self.root.join(format!("{last}.html")));
        }
        candidates
    }
}

impl PageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = self
            .candidates(url)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| Error::fetch(url, "no matching local file"))?;

        let bytes = std::fs::read(&path).map_err(|e| Error::fetch(url, e))?;
        tracing::debug!(%url, path = %path.display(), bytes = bytes.len(), "read local page");
        Ok(encoding::decode_page(&bytes, None))
    }
}

/// HTTP fetcher settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// `User-Agent` header.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Blocking HTTP fetcher. Retries are left to the caller.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the TLS backend cannot be set up.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().map_err(|e| Error::fetch(url, e))?;

        tracing::debug!(%url, %status, bytes = bytes.len(), "fetched page");
        Ok(encoding::decode_page(&bytes, content_type.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_for_site_url() {
        let fetcher = FileFetcher::new("/data/site");
        let candidates = fetcher.candidates("https://developers.google.com/earth-engine/datasets/catalog/COPERNICUS_S2_SR");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/data/site/earth-engine/datasets/catalog/COPERNICUS_S2_SR"),
                PathBuf::from("/data/site/earth-engine/datasets/catalog/COPERNICUS_S2_SR.html"),
                PathBuf::from("/data/site/earth-engine/datasets/catalog/COPERNICUS_S2_SR/index.html"),
                PathBuf::from("/data/site/COPERNICUS_S2_SR.html"),
            ]
        );
    }

    #[test]
    fn test_candidates_for_paths() {
        let fetcher = FileFetcher::new("/data/site");
        assert_eq!(fetcher.candidates("catalog.html"), vec![PathBuf::from("/data/site/catalog.html")]);
        assert_eq!(fetcher.candidates("file:///tmp/a.html"), vec![PathBuf::from("/tmp/a.html")]);
        assert_eq!(fetcher.candidates("https://example.com/"), vec![PathBuf::from("/data/site/index.html")]);
    }

    #[test]
    fn test_alias_wins() {
        let fetcher = FileFetcher::new("/data/site").with_alias(
            "https://developers.google.com/earth-engine/datasets/catalog/",
            "/tmp/saved_catalog.html",
        );
        assert_eq!(
            fetcher.candidates("https://developers.google.com/earth-engine/datasets/catalog"),
            vec![PathBuf::from("/tmp/saved_catalog.html")]
        );
    }

    #[test]
    fn test_fetch_reads_and_decodes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("LANDSAT_LC08.html"),
            b"<meta charset=\"windows-1252\"><h1>Landsat \xe9t\xe9</h1>",
        )
        .unwrap();

        let fetcher = FileFetcher::new(dir.path());
        let html = fetcher.fetch("https://developers.google.com/earth-engine/datasets/catalog/LANDSAT_LC08").unwrap();
        assert!(html.contains("Landsat été"));
    }

    #[test]
    fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path());
        let err = fetcher.fetch("https://example.com/nothing").unwrap_err();
        assert!(matches!(err, Error::FetchError { .. }));
    }

    #[test]
    fn test_http_fetcher_builds() {
        let config = HttpConfig {
            insecure: true,
            ..HttpConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
        assert!(USER_AGENT.starts_with("ee-catalog-crawler/"));
    }
}
