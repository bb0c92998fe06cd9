//! Error types for ee-catalog-crawler.
//!
//! Extraction itself never fails: a missing section means an empty field.
//! These errors come from the edges of the crate (fetching pages, reading
//! configuration, writing output files).

/// Error type for crawl and persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    FetchError {
        /// The URL that was requested.
        url: String,
        /// Collaborator-provided reason.
        message: String,
    },

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration file was unreadable or malformed.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem failure while reading or writing.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Convenience constructor for fetch failures.
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::FetchError {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;
