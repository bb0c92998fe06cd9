//! Title, description, tags and terms of use.

use dom_query::Selection;

use crate::dom;
use crate::metadata::parse_tag_list;
use crate::page::PageContext;
use crate::patterns::{ERROR_TITLE, TAG_PATH_MARKERS, TITLE_SEPARATOR};
use crate::record::DatasetRecord;
use crate::url_utils;

/// Paragraphs shorter than this are not taken as a description.
const MIN_DESCRIPTION_LEN: usize = 40;

/// Headings longer than this are prose, not titles.
const MAX_TITLE_LEN: usize = 300;

/// Longest anchor text accepted as a tag.
const MAX_TAG_LEN: usize = 60;

const DESCRIPTION_LABELS: &[&str] = &["Description", "Overview", "Summary", "Abstract"];
const KEYWORD_LABELS: &[&str] = &["Keywords", "Tags"];
const TERMS_LABELS: &[&str] = &["Terms of Use", "Terms of use", "License", "Licence", "Terms"];

/// Fill `layer_name`, `description`, `category_tags` and `terms_of_use`.
#[must_use]
pub fn extract_descriptive(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if record.layer_name.is_empty() {
        if let Some(title) = page_title(ctx) {
            tracing::debug!(%title, "layer name");
            record.layer_name = title;
        }
    }

    if record.description.is_empty() {
        if let Some(description) = description(ctx) {
            record.description = description;
        }
    }

    if record.category_tags.is_empty() {
        for tag in tags(ctx) {
            record.add_tag(&tag);
        }
    }

    if record.terms_of_use.is_empty() {
        if let Some(terms) = dom::find_label(&ctx.doc, TERMS_LABELS)
            .and_then(|label| dom::label_section(&label).map(|s| dom::visible_text(&s)))
            .filter(|t| !t.is_empty())
            .or_else(|| dom::labeled_value(&ctx.doc, TERMS_LABELS))
        {
            record.terms_of_use = terms;
        }
    }

    record
}

/// Usable dataset title: first `<h1>`, else `<title>` without the site suffix.
#[must_use]
pub fn page_title(ctx: &PageContext) -> Option<String> {
    let usable = |t: &str| !t.is_empty() && t.len() <= MAX_TITLE_LEN && !ERROR_TITLE.is_match(t);

    let heading = ctx
        .doc
        .select("h1")
        .nodes()
        .iter()
        .map(|n| dom::visible_text(&Selection::from(*n)))
        .find(|t| !t.is_empty());

    if let Some(heading) = heading {
        // An error heading means an error page, whatever the <title> says
        return usable(&heading).then_some(heading);
    }

    let title = dom::visible_text(&ctx.doc.select("title"));
    let first = TITLE_SEPARATOR.split(&title).next().unwrap_or_default().trim().to_string();
    usable(&first).then_some(first)
}

fn description(ctx: &PageContext) -> Option<String> {
    let labelled = dom::find_label(&ctx.doc, DESCRIPTION_LABELS)
        .and_then(|label| dom::label_section(&label))
        .map(|section| dom::visible_text(&section))
        .filter(|t| t.len() >= MIN_DESCRIPTION_LEN);
    if labelled.is_some() {
        return labelled;
    }

    ctx.main_content()
        .select("p")
        .nodes()
        .iter()
        .map(|n| dom::visible_text(&Selection::from(*n)))
        .find(|t| t.len() >= MIN_DESCRIPTION_LEN)
}

/// Tag-page anchors, then a labelled keyword list.
fn tags(ctx: &PageContext) -> Vec<String> {
    let mut tags: Vec<String> = ctx
        .doc
        .select("a[href]")
        .nodes()
        .iter()
        .filter_map(|n| {
            let anchor = Selection::from(*n);
            let href = dom::get_attribute(&anchor, "href")?;
            let path = url_utils::path_of(&href);
            if !TAG_PATH_MARKERS.iter().any(|m| path.contains(m)) {
                return None;
            }
            let text = dom::visible_text(&anchor);
            (!text.is_empty() && text.len() <= MAX_TAG_LEN).then_some(text)
        })
        .collect();

    if tags.is_empty() {
        if let Some(list) = dom::labeled_value(&ctx.doc, KEYWORD_LABELS) {
            tags = parse_tag_list(&list);
        }
    }
    tags
}
