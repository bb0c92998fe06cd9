//! Dataset provider.

use crate::dom;
use crate::page::PageContext;
use crate::patterns::PROVIDER_TEXT;
use crate::record::DatasetRecord;

const PROVIDER_LABELS: &[&str] = &["Dataset Provider", "Provider", "Data Provider", "Source"];

/// Words a captured name may not end with.
const TRAILING_CONNECTORS: &[&str] = &["of", "and", "for", "the", "at", "de", "du", "&"];

/// Longest value accepted as a provider name.
const MAX_PROVIDER_LEN: usize = 120;

/// Fill `dataset_provider`: labelled node, then free-text phrase, then meta tags.
#[must_use]
pub fn extract_provider(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if !record.dataset_provider.is_empty() {
        return record;
    }

    let provider = dom::labeled_value(&ctx.doc, PROVIDER_LABELS)
        .and_then(|v| clean_provider(&v))
        .or_else(|| provider_from_text(&ctx.text))
        .or_else(|| ctx.structured.provider.as_deref().and_then(clean_provider));

    if let Some(provider) = provider {
        tracing::debug!(%provider, "dataset provider");
        record.dataset_provider = provider;
    }
    record
}

/// First `Provider: X` / `hosted by X` phrase in free text.
#[must_use]
pub fn provider_from_text(text: &str) -> Option<String> {
    PROVIDER_TEXT.captures_iter(text).find_map(|caps| {
        let name = caps.get(1).or_else(|| caps.get(2))?;
        clean_provider(name.as_str())
    })
}

/// Trim punctuation and dangling connectors; reject empty or oversized values.
fn clean_provider(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    while let Some(last) = words.last() {
        let bare = last.trim_end_matches(['.', ',', ';', ':']);
        if bare.is_empty() || TRAILING_CONNECTORS.iter().any(|c| bare.eq_ignore_ascii_case(c)) {
            words.pop();
        } else {
            break;
        }
    }

    let name = words.join(" ");
    let name = name.trim_end_matches(['.', ',', ';', ':']).trim();
    if name.is_empty() || name.len() > MAX_PROVIDER_LEN {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> DatasetRecord {
        let ctx = PageContext::new(html, "https://example.com/x");
        extract_provider(&ctx, DatasetRecord::default())
    }

    #[test]
    fn test_labelled_provider() {
        let record = extract(
            r#"<dl><dt>Dataset Provider</dt><dd><a href="https://www.usgs.gov">USGS</a></dd></dl>
               <p>Provider: Someone Else</p>"#,
        );
        assert_eq!(record.dataset_provider, "USGS");
    }

    #[test]
    fn test_free_text_provider_trims_connectors() {
        let record = extract("<div>This collection is hosted by United States Geological Survey and partners.</div>");
        assert_eq!(record.dataset_provider, "United States Geological Survey");
    }

    #[test]
    fn test_meta_provider_fallback() {
        let record = extract(r#"<html><head><meta name="provider" content="ECMWF / Copernicus"></head><body><p>x</p></body></html>"#);
        assert_eq!(record.dataset_provider, "ECMWF / Copernicus");
    }

    #[test]
    fn test_existing_provider_kept() {
        let ctx = PageContext::new("<p>Provider: NASA</p>", "https://example.com/x");
        let mut record = DatasetRecord::default();
        record.dataset_provider = "JAXA".to_string();
        assert_eq!(extract_provider(&ctx, record).dataset_provider, "JAXA");
    }

    #[test]
    fn test_no_provider() {
        assert!(extract("<p>nothing here</p>").dataset_provider.is_empty());
    }

    #[test]
    fn test_clean_provider() {
        assert_eq!(clean_provider("NASA LP DAAC."), Some("NASA LP DAAC".to_string()));
        assert_eq!(clean_provider("  of the "), None);
    }
}
