//! Structured metadata: JSON-LD and `<meta>` tags.
//!
//! Values are collected once per page into [`StructuredMetadata`] (JSON-LD
//! first, then meta tags) and later merged into a record with
//! [`apply_structured`], which only fills fields that are still empty.

pub mod json_ld;
pub mod meta_tags;

use dom_query::Document;
use url::Url;

use crate::extractors::temporal::normalize_date;
use crate::links::Thumbnail;
use crate::patterns::ERROR_TITLE;
use crate::record::DatasetRecord;
use crate::url_utils;

pub use json_ld::extract_json_ld;
pub use meta_tags::{examine_meta, parse_tag_list};

/// Dataset fields declared by the page itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredMetadata {
    /// Dataset title.
    pub name: Option<String>,
    /// Dataset description.
    pub description: Option<String>,
    /// Provider, creator or publisher name.
    pub provider: Option<String>,
    /// Publication date or start of the temporal coverage.
    pub date_start: Option<String>,
    /// End of the temporal coverage.
    pub date_end: Option<String>,
    /// DOI without resolver prefix.
    pub doi: Option<String>,
    /// Keywords, declaration order.
    pub keywords: Vec<String>,
    /// Spatial coverage.
    pub location: Option<String>,
    /// License name or URL.
    pub license: Option<String>,
    /// Preview image URL, possibly relative.
    pub image: Option<String>,
    /// Citation texts.
    pub citations: Vec<String>,
}

impl StructuredMetadata {
    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Collect JSON-LD and meta-tag values from a document.
///
/// Must run before scripts are stripped from the tree.
#[must_use]
pub fn collect_structured(doc: &Document) -> StructuredMetadata {
    let metadata = json_ld::extract_json_ld(doc, StructuredMetadata::default());
    let metadata = meta_tags::examine_meta(doc, metadata);
    post_process(metadata)
}

/// Trim values and drop the ones that became empty.
fn post_process(mut metadata: StructuredMetadata) -> StructuredMetadata {
    for field in [
        &mut metadata.name,
        &mut metadata.description,
        &mut metadata.provider,
        &mut metadata.date_start,
        &mut metadata.date_end,
        &mut metadata.doi,
        &mut metadata.location,
        &mut metadata.license,
        &mut metadata.image,
    ] {
        *field = field
            .take()
            .map(|v| crate::dom::normalize_whitespace(&v))
            .filter(|v| !v.is_empty());
    }

    metadata.keywords.retain(|k| !k.trim().is_empty());
    metadata.citations.retain(|c| !c.trim().is_empty());
    metadata
}

/// Merge structured values into the empty fields of `record`.
#[must_use]
pub fn apply_structured(
    metadata: &StructuredMetadata,
    mut record: DatasetRecord,
    base: Option<&Url>,
) -> DatasetRecord {
    if record.layer_name.is_empty() {
        if let Some(name) = metadata.name.as_ref().filter(|n| !ERROR_TITLE.is_match(n)) {
            record.layer_name.clone_from(name);
        }
    }

    if record.description.is_empty() {
        if let Some(description) = &metadata.description {
            record.description.clone_from(description);
        }
    }

    if record.dataset_provider.is_empty() {
        if let Some(provider) = &metadata.provider {
            record.dataset_provider.clone_from(provider);
        }
    }

    if record.date_range.is_empty() {
        if let Some(start) = metadata.date_start.as_deref().and_then(normalize_date) {
            record.date_range.start = start;
        }
        if let Some(end) = metadata.date_end.as_deref().and_then(normalize_date) {
            record.date_range.end = end;
        }
    }

    if record.doi.is_empty() {
        if let Some(doi) = &metadata.doi {
            record.doi.clone_from(doi);
        }
    }

    if record.category_tags.is_empty() {
        for keyword in &metadata.keywords {
            record.add_tag(keyword);
        }
    }

    if record.location.is_empty() {
        if let Some(location) = &metadata.location {
            record.location.clone_from(location);
        }
    }

    if record.terms_of_use.is_empty() {
        if let Some(license) = &metadata.license {
            record.terms_of_use.clone_from(license);
        }
    }

    if record.citations.is_empty() {
        record.citations.clone_from(&metadata.citations);
    }

    if record.thumbnails.is_empty() {
        if let Some(image) = &metadata.image {
            let src = url_utils::resolve_href(image, base).map_or_else(|| image.clone(), |u| u.to_string());
            record.thumbnails.push(Thumbnail {
                src,
                ..Thumbnail::default()
            });
        }
    }

    tracing::debug!(layer_name = %record.layer_name, "applied structured metadata");
    record
}
