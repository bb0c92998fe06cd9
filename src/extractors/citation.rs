//! Citations and DOI.

use crate::dom;
use crate::page::PageContext;
use crate::patterns::DOI;
use crate::record::DatasetRecord;

const CITATION_LABELS: &[&str] = &["Citations", "Citation", "Suggested Citation", "How to cite"];

/// Citation texts must be longer than this to count.
const MIN_CITATION_LEN: usize = 10;

/// Fill `citations` and `doi` from the citations section, then the page.
#[must_use]
pub fn extract_citation(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    let section = dom::find_label(&ctx.doc, CITATION_LABELS)
        .and_then(|label| dom::label_section(&label).map(|s| dom::visible_text(&s)).or_else(|| dom::label_value(&label)))
        .or_else(|| dom::labeled_value(&ctx.doc, CITATION_LABELS))
        .filter(|text| text.len() > MIN_CITATION_LEN);

    if record.citations.is_empty() {
        if let Some(text) = &section {
            record.citations.push(text.clone());
        }
    }

    if record.doi.is_empty() {
        let doi = section
            .as_deref()
            .and_then(find_doi)
            .or_else(|| find_doi(&ctx.text));
        if let Some(doi) = doi {
            tracing::debug!(%doi, "doi");
            record.doi = doi;
        }
    }

    record
}

/// First DOI in `text`, without trailing sentence punctuation.
#[must_use]
pub fn find_doi(text: &str) -> Option<String> {
    let raw = DOI.find(text)?.as_str();
    let mut doi = raw.trim_end_matches(['.', ',', ';', ':']);
    // A closing parenthesis belongs to the DOI only when it opened one
    while doi.ends_with(')') && doi.matches('(').count() < doi.matches(')').count() {
        doi = doi[..doi.len() - 1].trim_end_matches(['.', ',', ';', ':']);
    }
    Some(doi.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> DatasetRecord {
        let ctx = PageContext::new(html, "https://example.com/x");
        extract_citation(&ctx, DatasetRecord::default())
    }

    #[test]
    fn test_citation_section() {
        let record = extract(
            "<p>See also doi:10.1000/unrelated.</p>
             <h3>Citations</h3>
             <div>Farr, T.G., et al., 2007, The Shuttle Radar Topography Mission, Reviews of Geophysics, 45, RG2004, doi:10.1029/2005RG000183.</div>",
        );
        assert_eq!(record.citations.len(), 1);
        assert!(record.citations[0].starts_with("Farr, T.G."));
        assert_eq!(record.doi, "10.1029/2005RG000183");
    }

    #[test]
    fn test_doi_page_fallback() {
        let record = extract("<p>Data available (https://doi.org/10.5067/MODIS/MOD13Q1.061).</p>");
        assert_eq!(record.doi, "10.5067/MODIS/MOD13Q1.061");
        assert!(record.citations.is_empty());
    }

    #[test]
    fn test_short_citation_rejected() {
        let record = extract("<h3>Citations</h3><div>None.</div>");
        assert!(record.citations.is_empty());
    }

    #[test]
    fn test_find_doi_keeps_balanced_parens() {
        assert_eq!(find_doi("10.1002/(SICI)1099-1085").as_deref(), Some("10.1002/(SICI)1099-1085"));
        assert_eq!(find_doi("no identifier"), None);
    }
}
