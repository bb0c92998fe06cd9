//! DOM access helpers over `dom_query`.
//!
//! Extractors go through these functions instead of calling `dom_query`
//! directly. Every helper treats an empty selection as "no data" and never
//! panics on missing nodes.

pub use dom_query::{Document, Selection};

pub use tendril::StrTendril;

use crate::patterns::{LABEL_SELECTOR, WHITESPACE_NORMALIZE};

/// Longest text a node may carry and still count as a `Label value` pair.
const MAX_INLINE_LABEL_LEN: usize = 240;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute value, trimmed, `None` when blank
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

// === Text Content ===

/// Get all text content of node and descendants, as stored.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Collapse whitespace runs and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// Readable text of a selection.
///
/// Text nodes are joined with spaces so `<dt>A</dt><dd>B</dd>` reads as
/// `A B`, and script/style content is skipped.
#[must_use]
pub fn visible_text(sel: &Selection) -> String {
    let mut out = String::new();

    for root in sel.nodes() {
        if root.is_text() {
            out.push_str(&root.text());
            out.push(' ');
            continue;
        }
        for node in root.descendants() {
            if !node.is_text() {
                continue;
            }
            let hidden = node.parent().is_some_and(|p| {
                p.node_name().is_some_and(|tag| {
                    matches!(
                        tag.to_ascii_lowercase().as_str(),
                        "script" | "style" | "noscript" | "template"
                    )
                })
            });
            if hidden {
                continue;
            }
            out.push_str(&node.text());
            out.push(' ');
        }
    }

    normalize_whitespace(&out)
}

// === Tree Navigation ===

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Get parent element, `None` at the root
#[must_use]
pub fn parent_element<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::parent)
        .filter(dom_query::NodeRef::is_element)
        .map(Selection::from)
}

// === Labelled Sections ===

/// Label text with trailing `:` removed.
fn label_key(text: &str) -> String {
    text.trim().trim_end_matches(':').trim().to_lowercase()
}

/// Whether no element below `sel` carries the same label on its own.
fn is_innermost(sel: &Selection, key: &str) -> bool {
    !sel.select("*")
        .iter()
        .any(|child| label_key(&visible_text(&child)) == key)
}

/// Find the innermost element whose whole text is one of `labels`.
///
/// Matching ignores case and a trailing colon, so `Dataset Provider:` is
/// found by `"dataset provider"`.
#[must_use]
pub fn find_label<'a>(doc: &'a Document, labels: &[&str]) -> Option<Selection<'a>> {
    let keys: Vec<String> = labels.iter().map(|l| label_key(l)).collect();

    for node in doc.select(LABEL_SELECTOR).nodes() {
        let sel = Selection::from(*node);
        let key = label_key(&visible_text(&sel));
        if key.is_empty() || key.len() > 60 {
            continue;
        }
        if keys.iter().any(|k| *k == key) && is_innermost(&sel, &key) {
            return Some(sel);
        }
    }

    None
}

/// Text that belongs to a label node.
///
/// Tries the label's next element sibling, then the remainder of its
/// parent's text, then the parent's next element sibling.
#[must_use]
pub fn label_value(label: &Selection) -> Option<String> {
    if let Some(text) = next_element_sibling(label)
        .map(|s| visible_text(&s))
        .filter(|t| !t.is_empty())
    {
        return Some(text);
    }

    let label_text = visible_text(label);
    let parent = parent_element(label)?;
    let parent_text = visible_text(&parent);
    if let Some(rest) = strip_prefix_ignore_case(&parent_text, &label_text).and_then(label_remainder) {
        return Some(rest.to_string());
    }

    next_element_sibling(&parent)
        .map(|s| visible_text(&s))
        .filter(|t| !t.is_empty())
}

/// The section belonging to a label: its next element sibling, or the
/// parent's next element sibling when the label is wrapped.
#[must_use]
pub fn label_section<'a>(label: &Selection<'a>) -> Option<Selection<'a>> {
    next_element_sibling(label).or_else(|| {
        parent_element(label)
            .filter(|p| label_key(&visible_text(p)) == label_key(&visible_text(label)))
            .and_then(|p| next_element_sibling(&p))
    })
}

/// Value for the first of `labels` present in the document.
///
/// Falls back to a short element whose text starts with the label, as in
/// `<p>Pixel Size: 30 meters</p>`.
#[must_use]
pub fn labeled_value(doc: &Document, labels: &[&str]) -> Option<String> {
    if let Some(value) = find_label(doc, labels).and_then(|l| label_value(&l)) {
        return Some(value);
    }

    for node in doc.select(LABEL_SELECTOR).nodes() {
        let sel = Selection::from(*node);
        let text = visible_text(&sel);
        if text.len() > MAX_INLINE_LABEL_LEN {
            continue;
        }
        for label in labels {
            if let Some(rest) = strip_prefix_ignore_case(&text, label).and_then(label_remainder) {
                if !sel.select(LABEL_SELECTOR).exists() {
                    return Some(rest.to_string());
                }
            }
        }
    }

    None
}

/// What follows a label, if the label ended at a word boundary.
fn label_remainder(rest: &str) -> Option<&str> {
    if !rest.starts_with([':', ' ']) {
        return None;
    }
    let rest = rest.trim_start().trim_start_matches(':').trim();
    (!rest.is_empty()).then_some(rest)
}

/// `text` without a case-insensitive `prefix`.
#[must_use]
pub fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
