//! Earth Engine code sample.

use crate::page::PageContext;
use crate::record::DatasetRecord;

/// Fill `gee_code_snippet` with the first code block using the `ee.` API.
#[must_use]
pub fn extract_code_snippet(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if record.gee_code_snippet.is_empty() {
        if let Some(code) = ctx.code_blocks.iter().find(|code| code.contains("ee.")) {
            record.gee_code_snippet.clone_from(code);
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ee_block() {
        let ctx = PageContext::new(
            "<pre>pip install earthengine-api</pre>
             <pre><code>var dataset = ee.Image('USGS/SRTMGL1_003');\nMap.addLayer(dataset);</code></pre>",
            "https://example.com/x",
        );
        let record = extract_code_snippet(&ctx, DatasetRecord::default());
        assert!(record.gee_code_snippet.starts_with("var dataset = ee.Image"));
        assert!(record.gee_code_snippet.contains("Map.addLayer"));
    }

    #[test]
    fn test_no_code() {
        let ctx = PageContext::new("<p>ee.Image mentioned in prose</p>", "https://example.com/x");
        assert!(extract_code_snippet(&ctx, DatasetRecord::default()).gee_code_snippet.is_empty());
    }
}
