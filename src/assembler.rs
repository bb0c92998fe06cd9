//! Record assembly and the deduplicating collection.
//!
//! A page is parsed once, typed, and run through the extractor chain for
//! its type. Enrichment and scoring follow. A panic anywhere in that
//! sequence yields the placeholder record instead of aborting the run.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::enrich::EnricherRegistry;
use crate::extractors::{
    extract_citation, extract_code_snippet, extract_descriptive, extract_provider, extract_satellites,
    extract_spatial, extract_structured, extract_technical, extract_temporal, extract_thumbnails, run_chain,
    Extractor,
};
use crate::links::{discover_links, CatalogLink};
use crate::options::Options;
use crate::page::PageContext;
use crate::page_type::{detect_page_type, PageType};
use crate::patterns::ERROR_TITLE;
use crate::record::DatasetRecord;
use crate::scoring::score_record;
use crate::url_utils;

const DETAIL_CHAIN: &[Extractor] = &[
    extract_structured,
    extract_descriptive,
    extract_temporal,
    extract_provider,
    extract_technical,
    extract_citation,
    extract_spatial,
    extract_code_snippet,
    extract_satellites,
    extract_thumbnails,
];

const SATELLITE_CHAIN: &[Extractor] = &[
    extract_descriptive,
    extract_satellites,
    extract_technical,
    extract_temporal,
    extract_provider,
    extract_spatial,
    extract_thumbnails,
    extract_structured,
];

const GENERIC_CHAIN: &[Extractor] = &[
    extract_descriptive,
    extract_temporal,
    extract_provider,
    extract_spatial,
    extract_structured,
];

const MINIMAL_DETAIL_CHAIN: &[Extractor] = &[
    extract_structured,
    extract_descriptive,
    extract_temporal,
    extract_provider,
];

const MINIMAL_CHAIN: &[Extractor] = &[extract_descriptive, extract_temporal, extract_provider];

/// Extractors for a page type.
#[must_use]
pub fn extraction_chain(page_type: PageType, minimal_mode: bool) -> &'static [Extractor] {
    match (page_type, minimal_mode) {
        (PageType::DatasetDetail, false) => DETAIL_CHAIN,
        (PageType::DatasetDetail, true) => MINIMAL_DETAIL_CHAIN,
        (PageType::SatelliteInfo, false) => SATELLITE_CHAIN,
        (_, true) => MINIMAL_CHAIN,
        (_, false) => GENERIC_CHAIN,
    }
}

/// Everything learned from one page.
#[derive(Debug, Clone, Default)]
pub struct PageAnalysis {
    /// Detected page type.
    pub page_type: PageType,
    /// Assembled record.
    pub record: DatasetRecord,
    /// Candidate links found on the page, priority order.
    pub links: Vec<CatalogLink>,
}

/// Parse, type, extract and score one page, and collect its candidate links.
///
/// Never panics: a failure inside extraction produces a placeholder record
/// of type `Unknown` with no links.
#[must_use]
pub fn analyze_page(
    html: &str,
    url: &str,
    link: Option<&CatalogLink>,
    options: &Options,
    enrichers: &EnricherRegistry,
) -> PageAnalysis {
    let mut analysis = extract_page(html, url, link, options, enrichers);
    score_record(&mut analysis.record);
    analysis
}

/// [`analyze_page`] without the scoring step.
pub(crate) fn extract_page(
    html: &str,
    url: &str,
    link: Option<&CatalogLink>,
    options: &Options,
    enrichers: &EnricherRegistry,
) -> PageAnalysis {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let ctx = PageContext::new(html, url);
        let page_type = detect_page_type(&ctx);
        let record = extract_from_context(&ctx, page_type, link, options, enrichers);
        let links = discover_links(&ctx.doc, ctx.base.as_ref());
        PageAnalysis {
            page_type,
            record,
            links,
        }
    }));

    result.unwrap_or_else(|_| {
        tracing::warn!(%url, "extraction failed, producing placeholder record");
        PageAnalysis {
            record: DatasetRecord::placeholder(url),
            ..PageAnalysis::default()
        }
    })
}

/// Assemble a scored record for one page.
#[must_use]
pub fn assemble_record(
    html: &str,
    url: &str,
    link: Option<&CatalogLink>,
    options: &Options,
    enrichers: &EnricherRegistry,
) -> DatasetRecord {
    analyze_page(html, url, link, options, enrichers).record
}

/// Run the chain for `page_type` over an already parsed page and score it.
#[must_use]
pub fn assemble_from_context(
    ctx: &PageContext,
    page_type: PageType,
    link: Option<&CatalogLink>,
    options: &Options,
    enrichers: &EnricherRegistry,
) -> DatasetRecord {
    let mut record = extract_from_context(ctx, page_type, link, options, enrichers);
    score_record(&mut record);
    record
}

fn extract_from_context(
    ctx: &PageContext,
    page_type: PageType,
    link: Option<&CatalogLink>,
    options: &Options,
    enrichers: &EnricherRegistry,
) -> DatasetRecord {
    let chain = extraction_chain(page_type, options.minimal_mode);
    let mut record = run_chain(ctx, DatasetRecord::new(&ctx.url), chain);

    if let Some(link) = link {
        record = fill_from_link(record, link);
    }

    if !options.include_thumbnails {
        record.thumbnails.clear();
    }

    if options.enrich && !options.minimal_mode {
        record = enrichers.apply(record, &ctx.text);
    }

    tracing::debug!(layer_name = %record.layer_name, ?page_type, "assembled record");
    record
}

/// Link text and thumbnail fill what the page itself left empty.
fn fill_from_link(mut record: DatasetRecord, link: &CatalogLink) -> DatasetRecord {
    if record.layer_name.is_empty() {
        let text = link.text.trim();
        if !text.is_empty() && !ERROR_TITLE.is_match(text) {
            record.layer_name = text.to_string();
        }
    }
    if record.thumbnails.is_empty() {
        if let Some(thumb) = &link.thumbnail {
            record.thumbnails.push(thumb.clone());
        }
    }
    record
}

/// Ordered, deduplicated set of records.
///
/// Two records are duplicates when their trimmed `layer_name`s are equal;
/// the first one pushed is kept.
#[derive(Debug, Clone, Default)]
pub struct CatalogCollection {
    records: Vec<DatasetRecord>,
    names: HashSet<String>,
    urls: HashSet<String>,
}

impl CatalogCollection {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` unless it is a placeholder, unnamed, or a duplicate.
    ///
    /// Returns whether it was appended.
    pub fn push(&mut self, record: DatasetRecord) -> bool {
        if record.is_placeholder() {
            return false;
        }
        let key = record.layer_name.trim();
        if key.is_empty() || self.names.contains(key) {
            return false;
        }

        self.names.insert(key.to_string());
        self.urls.insert(url_utils::normalize_url(&record.source_url));
        self.records.push(record);
        true
    }

    /// Whether a record with this layer name is present.
    #[must_use]
    pub fn contains_name(&self, layer_name: &str) -> bool {
        self.names.contains(layer_name.trim())
    }

    /// Whether a record was extracted from this URL.
    #[must_use]
    pub fn contains_url(&self, url: &str) -> bool {
        self.urls.contains(&url_utils::normalize_url(url))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DatasetRecord> {
        self.records.iter()
    }

    /// Records as a slice.
    #[must_use]
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// Consume into the ordered records.
    #[must_use]
    pub fn into_records(self) -> Vec<DatasetRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a CatalogCollection {
    type Item = &'a DatasetRecord;
    type IntoIter = std::slice::Iter<'a, DatasetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
