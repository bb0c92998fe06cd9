//! JSON-LD Metadata Parsing
//!
//! Reads schema.org `Dataset` descriptions embedded as
//! `<script type="application/ld+json">`. Objects, top-level arrays and
//! `@graph` containers are walked recursively; blocks that fail to parse are
//! skipped.

use dom_query::{Document, Selection};
use serde_json::{Map, Value};

use super::StructuredMetadata;
use crate::dom;
use crate::patterns::DOI;

/// Typed schema object with its relevance score.
#[derive(Debug, Clone)]
struct SchemaData {
    data: Map<String, Value>,
    importance: i32,
}

/// Fill empty fields of `original` from JSON-LD blocks.
///
/// Dataset-typed objects are consulted first, then catalog and page
/// objects; the first schema that offers a field wins.
#[must_use]
pub fn extract_json_ld(doc: &Document, original: StructuredMetadata) -> StructuredMetadata {
    let mut result = original;

    for schema in decode_json_ld(doc) {
        let data = &schema.data;

        if result.name.is_none() {
            result.name = get_single_string_value(data, "name")
                .or_else(|| get_single_string_value(data, "headline"));
        }

        if result.description.is_none() {
            result.description = get_single_string_value(data, "description");
        }

        if result.provider.is_none() {
            result.provider = ["provider", "creator", "publisher"]
                .iter()
                .find_map(|key| data.get(*key).and_then(entity_name));
        }

        if result.date_start.is_none() && result.date_end.is_none() {
            if let Some((start, end)) =
                get_single_string_value(data, "temporalCoverage").and_then(|t| split_coverage(&t))
            {
                result.date_start = Some(start);
                result.date_end = end;
            }
        }

        if result.date_start.is_none() {
            result.date_start = get_single_string_value(data, "datePublished");
        }

        if result.doi.is_none() {
            result.doi = data.get("identifier").and_then(doi_from_identifier);
        }

        if result.keywords.is_empty() {
            if let Some(keywords) = get_string_values(data, "keywords") {
                result.keywords = keywords;
            }
        }

        if result.location.is_none() {
            result.location = data.get("spatialCoverage").and_then(place_name);
        }

        if result.license.is_none() {
            result.license = data.get("license").and_then(license_text);
        }

        if result.image.is_none() {
            result.image = extract_schema_image(data);
        }

        if result.citations.is_empty() {
            result.citations = data.get("citation").map(citation_texts).unwrap_or_default();
        }
    }

    result
}

/// Parse the JSON-LD scripts and return relevant schemas, most important first.
fn decode_json_ld(doc: &Document) -> Vec<SchemaData> {
    let mut schemas: Vec<SchemaData> = Vec::new();

    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let script_sel = Selection::from(*script);
        let json_text = dom::text_content(&script_sel).trim().to_string();

        if json_text.is_empty() {
            continue;
        }

        let data: Value = match serde_json::from_str(&json_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(%err, "skipping malformed JSON-LD block");
                continue;
            }
        };

        process_schema_value(&data, 0, &mut schemas);
    }

    // Stable, so document order breaks ties
    schemas.sort_by(|a, b| b.importance.cmp(&a.importance));
    schemas
}

/// Recursively collect typed schema objects.
fn process_schema_value(value: &Value, depth: i32, schemas: &mut Vec<SchemaData>) {
    match value {
        Value::Object(map) => {
            let types = get_schema_types(map);
            let next_depth = if types.is_empty() {
                depth
            } else {
                if let Some(importance) = calculate_importance(&types, depth) {
                    schemas.push(SchemaData {
                        data: map.clone(),
                        importance,
                    });
                }
                depth + 1
            };

            for (key, val) in map {
                // Provider and creator objects are read through their parent
                if matches!(key.as_str(), "provider" | "creator" | "publisher") {
                    continue;
                }
                process_schema_value(val, next_depth, schemas);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                process_schema_value(item, depth, schemas);
            }
        }
        _ => {}
    }
}

/// Lowercased `@type` values of a schema object.
fn get_schema_types(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("@type") {
        Some(Value::String(s)) => vec![s.to_lowercase()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_lowercase)
            .collect(),
        _ => Vec::new(),
    }
}

/// `None` for types that never describe a dataset.
fn calculate_importance(types: &[String], depth: i32) -> Option<i32> {
    let base = if types.iter().any(|t| t == "dataset") {
        100
    } else if types
        .iter()
        .any(|t| matches!(t.as_str(), "datacatalog" | "datadownload" | "webpage" | "creativework"))
    {
        50
    } else {
        return None;
    };
    Some(base - depth * 10)
}

/// Name of a provider/creator/publisher value: a string, an object with
/// `name`, or the first usable element of an array.
fn entity_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => get_single_string_value(obj, "name")
            .or_else(|| get_single_string_value(obj, "legalName")),
        Value::Array(arr) => arr.iter().find_map(entity_name),
        _ => None,
    }
}

/// DOI inside an identifier string, `PropertyValue` or array.
fn doi_from_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => DOI.find(s).map(|m| m.as_str().trim_end_matches('.').to_string()),
        Value::Object(obj) => ["value", "url", "@id"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(doi_from_identifier)),
        Value::Array(arr) => arr.iter().find_map(doi_from_identifier),
        _ => None,
    }
}

/// `spatialCoverage` as a place name.
fn place_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => get_single_string_value(obj, "name"),
        Value::Array(arr) => arr.iter().find_map(place_name),
        _ => None,
    }
}

fn license_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => get_single_string_value(obj, "name")
            .or_else(|| get_single_string_value(obj, "url")),
        Value::Array(arr) => arr.iter().find_map(license_text),
        _ => None,
    }
}

fn citation_texts(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => non_empty(s).into_iter().collect(),
        Value::Object(obj) => get_single_string_value(obj, "name")
            .or_else(|| get_single_string_value(obj, "citation"))
            .into_iter()
            .collect(),
        Value::Array(arr) => arr.iter().flat_map(citation_texts).collect(),
        _ => Vec::new(),
    }
}

/// Split `start/end` temporal coverage. `..` or an empty end means open.
fn split_coverage(coverage: &str) -> Option<(String, Option<String>)> {
    let (start, end) = coverage.split_once('/')?;
    let start = non_empty(start)?;
    let end = end.trim();
    let end = if end.is_empty() || end == ".." {
        Some("Present".to_string())
    } else {
        Some(end.to_string())
    };
    Some((start, end))
}

fn get_string_values(data: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let value = data.get(key)?;

    let mut result = Vec::new();

    match value {
        Value::String(s) => {
            result.extend(s.split(',').filter_map(non_empty));
        }
        Value::Array(arr) => {
            result.extend(arr.iter().filter_map(Value::as_str).filter_map(non_empty));
        }
        _ => {}
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

fn get_single_string_value(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => non_empty(s),
        Value::Array(arr) => arr.first().and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}

fn extract_schema_image(data: &Map<String, Value>) -> Option<String> {
    match data.get("image")? {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => get_single_string_value(obj, "url")
            .or_else(|| get_single_string_value(obj, "contentUrl")),
        Value::Array(arr) => match arr.first()? {
            Value::String(s) => non_empty(s),
            Value::Object(obj) => get_single_string_value(obj, "url"),
            _ => None,
        },
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
