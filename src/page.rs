//! Per-page extraction context.
//!
//! A page is parsed once. Structured metadata is read while scripts are
//! still in the tree, then scripts and styles are dropped and the readable
//! text is computed for the regex extractors.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::metadata::{self, StructuredMetadata};
use crate::patterns::CODE_SELECTOR;
use crate::url_utils;

/// Everything an extractor may look at for one page.
pub struct PageContext {
    /// Parsed document, scripts removed.
    pub doc: Document,
    /// URL the page was fetched from.
    pub url: String,
    /// Parsed form of `url`, when it is a valid http(s)/file URL.
    pub base: Option<Url>,
    /// Whitespace-normalized readable text of the body.
    pub text: String,
    /// `text` lowercased, for marker lookups.
    pub text_lower: String,
    /// Resolved `<link rel="canonical">` target.
    pub canonical: Option<String>,
    /// Text of every `<pre>`/`<code>` block, surrounding whitespace trimmed.
    pub code_blocks: Vec<String>,
    /// JSON-LD and meta-tag values read before script removal.
    pub structured: StructuredMetadata,
}

impl PageContext {
    /// Parse `html` fetched from `url`.
    #[must_use]
    pub fn new(html: &str, url: &str) -> Self {
        let doc = dom::parse(html);
        let base = url_utils::parse_base(url);

        let structured = metadata::collect_structured(&doc);
        doc.select("script, style, noscript, template").remove();

        let canonical = dom::non_empty_attribute(&doc.select(r#"link[rel="canonical"]"#), "href")
            .map(|href| {
                url_utils::resolve_href(&href, base.as_ref()).map_or(href, |u| u.to_string())
            });

        let code_blocks = doc
            .select(CODE_SELECTOR)
            .nodes()
            .iter()
            .map(|node| dom::text_content(&Selection::from(*node)).trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();

        let body = doc.select("body");
        let text = if body.exists() {
            dom::visible_text(&body)
        } else {
            dom::visible_text(&doc.select("html"))
        };
        let text_lower = text.to_lowercase();

        Self {
            doc,
            url: url.to_string(),
            base,
            text,
            text_lower,
            canonical,
            code_blocks,
            structured,
        }
    }

    /// Main content container, or the body when none is marked up.
    #[must_use]
    pub fn main_content(&self) -> Selection<'_> {
        let main = self.doc.select(crate::patterns::MAIN_SELECTOR).first();
        if main.exists() {
            main
        } else {
            self.doc.select("body")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_strips_scripts_from_text() {
        let ctx = PageContext::new(
            r#"<html><head><script type="application/ld+json">{"@type":"Dataset","name":"DEM"}</script></head>
               <body><h1>SRTM DEM</h1><script>var bands = 1;</script></body></html>"#,
            "https://example.com/srtm",
        );

        assert_eq!(ctx.text, "SRTM DEM");
        assert_eq!(ctx.structured.name.as_deref(), Some("DEM"));
        assert!(ctx.doc.select("script").is_empty());
    }

    #[test]
    fn test_canonical_resolved() {
        let ctx = PageContext::new(
            r#"<html><head><link rel="canonical" href="/earth-engine/datasets/catalog/X"></head><body></body></html>"#,
            "https://developers.google.com/earth-engine/datasets/catalog/X?hl=en",
        );
        assert_eq!(
            ctx.canonical.as_deref(),
            Some("https://developers.google.com/earth-engine/datasets/catalog/X")
        );
    }

    #[test]
    fn test_code_blocks_collected() {
        let ctx = PageContext::new(
            "<pre>\nvar dataset = ee.ImageCollection('X');\n</pre><p>text</p><code> </code>",
            "not a url",
        );
        assert_eq!(ctx.code_blocks, vec!["var dataset = ee.ImageCollection('X');"]);
        assert!(ctx.base.is_none());
    }

    #[test]
    fn test_main_content_falls_back_to_body() {
        let ctx = PageContext::new("<body><p>x</p></body>", "https://example.com");
        assert_eq!(dom::tag_name(&ctx.main_content()), Some("body".to_string()));

        let ctx = PageContext::new("<body><article><p>x</p></article></body>", "https://example.com");
        assert_eq!(dom::tag_name(&ctx.main_content()), Some("article".to_string()));
    }
}
