//! Page-type detection.
//!
//! Checks run in a fixed order. Dataset-detail markers come before catalog
//! phrases because a detail page's breadcrumb usually says "Data Catalog".

use serde::{Deserialize, Serialize};

use crate::page::PageContext;
use crate::patterns::{CATALOG_MARKERS, DETAIL_MARKERS, SATELLITE_MARKERS};
use crate::url_utils;

/// Coarse classification of a fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    /// Catalog index listing many datasets.
    CatalogMain,
    /// One dataset.
    DatasetDetail,
    /// Satellite or mission overview.
    SatelliteInfo,
    /// None of the above.
    #[default]
    Unknown,
}

/// Inputs of the detector, separated from the DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSignals<'a> {
    /// Canonical URL of the page, if declared.
    pub canonical_url: Option<&'a str>,
    /// Readable page text.
    pub text: &'a str,
    /// Text of `<pre>`/`<code>` blocks.
    pub code_blocks: &'a [String],
}

/// Classify from pre-computed signals.
#[must_use]
pub fn classify_signals(signals: &PageSignals) -> PageType {
    if let Some(canonical) = signals.canonical_url {
        let path = url_utils::path_of(canonical);
        if path.contains("/datasets/catalog/") && !path.trim_end_matches('/').ends_with("/datasets/catalog") {
            return PageType::DatasetDetail;
        }
        if path.trim_end_matches('/').ends_with("/datasets") {
            return PageType::CatalogMain;
        }
    }

    if DETAIL_MARKERS.is_match(signals.text) {
        return PageType::DatasetDetail;
    }

    if signals.code_blocks.iter().any(|code| code.contains("ee.")) {
        return PageType::DatasetDetail;
    }

    if CATALOG_MARKERS.is_match(signals.text) {
        return PageType::CatalogMain;
    }

    if SATELLITE_MARKERS.is_match(signals.text) {
        return PageType::SatelliteInfo;
    }

    PageType::Unknown
}

/// Classify a parsed page.
#[must_use]
pub fn detect_page_type(ctx: &PageContext) -> PageType {
    let page_type = classify_signals(&PageSignals {
        canonical_url: ctx.canonical.as_deref(),
        text: &ctx.text,
        code_blocks: &ctx.code_blocks,
    });
    tracing::debug!(url = %ctx.url, ?page_type, "detected page type");
    page_type
}
