//! Missions and sensors named by the page.

use crate::page::PageContext;
use crate::patterns::SATELLITE_NAMES;
use crate::record::DatasetRecord;

/// Fill `satellites_used`, first-seen order, title before body.
#[must_use]
pub fn extract_satellites(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if !record.satellites_used.is_empty() {
        return record;
    }

    let haystack = format!("{} {} {}", record.layer_name, record.description, ctx.text);
    for name in satellite_names(&haystack) {
        record.add_satellite(&name);
    }
    if !record.satellites_used.is_empty() {
        tracing::debug!(satellites = ?record.satellites_used, "satellites");
    }
    record
}

/// Canonical mission names in order of appearance, with repeats.
#[must_use]
pub fn satellite_names(text: &str) -> Vec<String> {
    SATELLITE_NAMES
        .captures_iter(text)
        .filter_map(|caps| {
            if let Some(n) = caps.get(1) {
                Some(format!("Landsat {}", n.as_str()))
            } else if let Some(n) = caps.get(2) {
                Some(format!("Sentinel-{}", n.as_str()))
            } else {
                caps.get(3).map(|m| m.as_str().to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(
            satellite_names("LANDSAT-8 and landsat 9, Sentinel 2A, MODIS Terra"),
            vec!["Landsat 8", "Landsat 9", "Sentinel-2", "MODIS", "Terra"]
        );
    }

    #[test]
    fn test_ignores_lowercase_common_words() {
        assert!(satellite_names("terra firma and aqua blue").is_empty());
    }

    #[test]
    fn test_extract_dedups_title_first() {
        let ctx = PageContext::new(
            "<p>Sentinel-2 complements Landsat 8. Sentinel-2B launched later.</p>",
            "https://example.com/x",
        );
        let mut record = DatasetRecord::default();
        record.layer_name = "Harmonized Landsat Sentinel-2".to_string();

        let record = extract_satellites(&ctx, record);
        assert_eq!(record.satellites_used, vec!["Sentinel-2", "Landsat 8"]);
    }
}
