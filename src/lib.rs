//! # ee-catalog-crawler
//!
//! Crawler and metadata extractor for the Earth Engine dataset catalog.
//!
//! A crawl starts at a catalog page, classifies every link on it, follows
//! the dataset candidates and turns each page into a [`DatasetRecord`]:
//! title, temporal coverage, provider, bands, pixel size, citations, DOI,
//! spatial scope, code sample and thumbnails, followed by confidence and
//! quality scores. Records can be written as JSON or flattened CSV.
//!
//! ## Quick Start
//!
//! ```rust
//! use ee_catalog_crawler::extract_record;
//!
//! let html = r#"<html><body>
//!   <h1>NASA SRTM Digital Elevation 30m</h1>
//!   <p>Dataset Availability 2000-02-11T00:00:00Z - 2000-02-22T00:00:00Z</p>
//! </body></html>"#;
//!
//! let record = extract_record(html, "https://developers.google.com/earth-engine/datasets/catalog/USGS_SRTMGL1_003");
//! assert_eq!(record.layer_name, "NASA SRTM Digital Elevation 30m");
//! assert_eq!(record.date_range.start, "2000-02-11");
//! ```
//!
//! ## Crawling
//!
//! [`Crawler::run`] drives a whole run against any [`PageFetcher`]:
//! [`FileFetcher`] reads saved pages from disk and [`HttpFetcher`] uses a
//! blocking HTTP client. Extraction never fails; a page that cannot be read
//! yields empty fields or the placeholder record.

mod error;
mod options;
mod patterns;

/// DOM helpers over `dom_query`: attributes, visible text, labelled values.
pub mod dom;

/// Parsed page plus the text and signals every extractor shares.
pub mod page;

/// Link discovery, junk filtering, typing and priority.
pub mod links;

/// Page-type detection.
pub mod page_type;

/// JSON-LD and `<meta>` metadata.
pub mod metadata;

/// Field extractors, one module per field family.
pub mod extractors;

/// Enrichment strategies (theme classification, gazetteer).
pub mod enrich;

/// Confidence, completeness and quality scoring.
pub mod scoring;

/// Record assembly and deduplication.
pub mod assembler;

/// Page fetchers.
pub mod fetch;

/// Crawl orchestration.
pub mod crawler;

/// JSON and CSV persistence.
pub mod output;

/// Dataset record types.
pub mod record;

/// URL utilities for resolution, normalization and host matching.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use assembler::{analyze_page, assemble_record, CatalogCollection, PageAnalysis};
pub use crawler::{CrawlReport, CrawlState, Crawler, StopHandle};
pub use enrich::{Enricher, EnricherRegistry, EnrichmentResult};
pub use error::{Error, Result};
pub use fetch::{FileFetcher, HttpConfig, HttpFetcher, PageFetcher};
pub use links::{classify_link, discover_links, CatalogLink, JunkReason, LinkClassification, LinkType, Thumbnail};
pub use options::Options;
pub use page_type::PageType;
pub use record::{Confidence, DatasetRecord, DateRange, Quality};

/// Extract one record from a page using default options and enrichers.
///
/// # Example
///
/// ```rust
/// use ee_catalog_crawler::extract_record;
///
/// let record = extract_record("<html><body><h1>404</h1></body></html>", "https://example.com/x");
/// assert!(record.layer_name.is_empty());
/// ```
#[must_use]
pub fn extract_record(html: &str, url: &str) -> DatasetRecord {
    extract_record_with_options(html, url, &Options::default())
}

/// Extract one record from a page with custom options.
///
/// # Example
///
/// ```rust
/// use ee_catalog_crawler::{extract_record_with_options, Options};
///
/// let options = Options {
///     minimal_mode: true,
///     ..Options::default()
/// };
/// let html = "<html><body><h1>MOD13Q1.061 Terra Vegetation Indices</h1></body></html>";
/// let record = extract_record_with_options(html, "https://example.com/mod13q1", &options);
/// assert_eq!(record.layer_name, "MOD13Q1.061 Terra Vegetation Indices");
/// ```
#[must_use]
pub fn extract_record_with_options(html: &str, url: &str, options: &Options) -> DatasetRecord {
    assemble_record(html, url, None, options, &EnricherRegistry::with_defaults())
}

/// Extract one record from raw bytes, detecting the encoding from
/// `<meta charset>` first.
///
/// ```rust
/// use ee_catalog_crawler::extract_record_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><h1>M\xE9t\xE9o-France ARPEGE</h1></body></html>";
/// let record = extract_record_bytes(html, "https://example.com/arpege");
/// assert_eq!(record.layer_name, "Météo-France ARPEGE");
/// ```
#[must_use]
pub fn extract_record_bytes(html: &[u8], url: &str) -> DatasetRecord {
    let html = encoding::decode_page(html, None);
    extract_record(&html, url)
}
