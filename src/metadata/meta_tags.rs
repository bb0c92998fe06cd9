//! HTML Meta Tag Extraction
//!
//! Open Graph, Highwire `citation_*`, Dublin Core and plain `name=` meta
//! tags, routed by lowercased name. Values only fill fields that are still
//! empty, so the JSON-LD pass keeps precedence.

use dom_query::{Document, Selection};

use super::StructuredMetadata;
use crate::dom;
use crate::patterns::DOI;

/// Examine `<meta>` tags and fill empty fields of `original`.
#[must_use]
pub fn examine_meta(doc: &Document, original: StructuredMetadata) -> StructuredMetadata {
    let mut result = original;

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);

        let name = dom::get_attribute(&meta, "name")
            .or_else(|| dom::get_attribute(&meta, "property"))
            .or_else(|| dom::get_attribute(&meta, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();

        let content = dom::get_attribute(&meta, "content")
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if name.is_empty() || content.is_empty() {
            continue;
        }

        match name.as_str() {
            "citation_title" | "dc.title" | "og:title" | "twitter:title" => {
                if result.name.is_none() {
                    result.name = Some(content);
                }
            }

            "description" | "og:description" | "dc.description" | "twitter:description" => {
                if result.description.is_none() {
                    result.description = Some(content);
                }
            }

            "provider" | "citation_publisher" | "dc.publisher" | "dcterms.publisher"
            | "dc.creator" | "citation_author_institution" => {
                if result.provider.is_none() {
                    result.provider = Some(content);
                }
            }

            "citation_date" | "citation_publication_date" | "dc.date" | "dc.date.issued"
            | "dcterms.created" | "datepublished" => {
                if result.date_start.is_none() {
                    result.date_start = Some(content);
                }
            }

            "citation_doi" | "dc.identifier" | "prism.doi" => {
                if result.doi.is_none() {
                    result.doi = DOI.find(&content).map(|m| m.as_str().trim_end_matches('.').to_string());
                }
            }

            "keywords" | "citation_keywords" | "dc.subject" => {
                if result.keywords.is_empty() {
                    result.keywords = parse_tag_list(&content);
                }
            }

            "dc.coverage" | "dcterms.spatial" => {
                if result.location.is_none() {
                    result.location = Some(content);
                }
            }

            "dc.rights" | "dcterms.license" | "license" => {
                if result.license.is_none() {
                    result.license = Some(content);
                }
            }

            "og:image" | "twitter:image" | "thumbnail" => {
                if result.image.is_none() {
                    result.image = Some(content);
                }
            }

            "citation_reference" => {
                result.citations.push(content);
            }

            _ => {}
        }
    }

    result
}

/// Split a comma or semicolon separated tag list.
#[must_use]
pub fn parse_tag_list(content: &str) -> Vec<String> {
    content
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
