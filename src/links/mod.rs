//! Link classification and candidate discovery.
//!
//! Every anchor on a scanned page is run through the junk cascade in
//! [`classify`]. Survivors become [`CatalogLink`]s, typed and prioritized,
//! and are handed to the crawler in priority order.

pub mod classify;

use std::collections::HashSet;

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom;
use crate::url_utils;

pub use classify::{
    classify_link, extraction_priority, is_junk_link, junk_reason, link_type_for,
    looks_like_dataset_link,
};

/// Kind of page a candidate link is expected to lead to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Mission or satellite overview.
    SatelliteInfo,
    /// Individual dataset page.
    DatasetDetail,
    /// Listing of datasets sharing a tag.
    TagPage,
    /// Coverage or availability page.
    DataCoverage,
    /// Guides and references.
    Documentation,
    /// Band tables, algorithm descriptions.
    Technical,
    /// Anything else that is not junk.
    #[default]
    General,
}

/// Why a link was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunkReason {
    /// Home/about/login style link, in-page anchor or empty href.
    Navigation,
    /// Social platform or call-to-action.
    SocialMedia,
    /// Non-http scheme or utility action (print, download ...).
    Utility,
    /// Advertisement or tracking link.
    Advertisement,
    /// Placeholder href such as `javascript:void(0)`.
    Broken,
    /// Known non-dataset external domain.
    ExternalDomain,
}

/// Result of classifying one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClassification {
    /// Excluded from the candidate set.
    Junk(JunkReason),
    /// Kept, with its type and priority.
    Candidate {
        /// Expected target kind.
        link_type: LinkType,
        /// Higher is more likely a real dataset link.
        priority: u32,
    },
}

impl LinkClassification {
    /// Whether the link was excluded.
    #[must_use]
    pub fn is_junk(&self) -> bool {
        matches!(self, Self::Junk(_))
    }
}

/// Preview image attached to a link or record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    /// Absolute image URL.
    pub src: String,
    /// `alt` attribute.
    pub alt: String,
    /// `title` attribute.
    pub title: String,
    /// `width` attribute as written.
    pub width: String,
    /// `height` attribute as written.
    pub height: String,
}

impl Thumbnail {
    /// Build from an `<img>` element, resolving `src` (or `data-src`).
    #[must_use]
    pub fn from_img(img: &Selection, base: Option<&Url>) -> Option<Self> {
        let raw = dom::non_empty_attribute(img, "src")
            .or_else(|| dom::non_empty_attribute(img, "data-src"))?;
        if raw.starts_with("data:") {
            return None;
        }
        let src = url_utils::resolve_href(&raw, base).map_or(raw, |u| u.to_string());

        Some(Self {
            src,
            alt: dom::non_empty_attribute(img, "alt").unwrap_or_default(),
            title: dom::non_empty_attribute(img, "title").unwrap_or_default(),
            width: dom::non_empty_attribute(img, "width").unwrap_or_default(),
            height: dom::non_empty_attribute(img, "height").unwrap_or_default(),
        })
    }
}

/// A candidate anchor discovered on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLink {
    /// Absolute URL.
    pub href: String,
    /// Anchor text, whitespace-normalized.
    pub text: String,
    /// `title` attribute, empty when absent.
    pub title: String,
    /// Image nested in the anchor.
    pub thumbnail: Option<Thumbnail>,
    /// Expected target kind.
    pub link_type: LinkType,
    /// Processing order key.
    pub extraction_priority: u32,
}

/// Collect candidate links from a parsed page.
///
/// Junk anchors are dropped before resolution. Survivors must resolve to an
/// http(s) or `file:` URL other than the page itself; duplicate targets keep
/// their first anchor. The result is stably sorted by descending priority.
#[must_use]
pub fn discover_links(doc: &Document, base: Option<&Url>) -> Vec<CatalogLink> {
    let page_key = base.map(|b| url_utils::normalize_url(b.as_str()));
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for node in doc.select("a[href]").nodes() {
        let anchor = Selection::from(*node);
        let raw_href = dom::get_attribute(&anchor, "href").unwrap_or_default();
        let text = dom::visible_text(&anchor);
        let title = dom::non_empty_attribute(&anchor, "title").unwrap_or_default();
        // Image-only anchors are labelled by their alt/title text
        let label = if text.is_empty() {
            let img = anchor.select("img");
            dom::non_empty_attribute(&img, "alt")
                .or_else(|| dom::non_empty_attribute(&img, "title"))
                .unwrap_or_else(|| title.clone())
        } else {
            text
        };

        let LinkClassification::Candidate { link_type, priority } = classify_link(&raw_href, &label)
        else {
            continue;
        };

        let Some(resolved) = url_utils::resolve_href(&raw_href, base) else {
            continue;
        };
        let key = url_utils::normalize_url(resolved.as_str());
        if page_key.as_deref() == Some(key.as_str()) || !seen.insert(key) {
            continue;
        }

        let thumbnail = anchor
            .select("img")
            .nodes()
            .first()
            .and_then(|img| Thumbnail::from_img(&Selection::from(*img), base));

        links.push(CatalogLink {
            href: resolved.to_string(),
            text: label,
            title,
            thumbnail,
            link_type,
            extraction_priority: priority,
        });
    }

    links.sort_by(|a, b| b.extraction_priority.cmp(&a.extraction_priority));
    tracing::debug!(candidates = links.len(), "discovered candidate links");
    links
}
