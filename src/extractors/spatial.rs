//! Coarse spatial scope.
//!
//! Only the closed scope vocabulary is recognised here. Place names are left
//! to the enrichment strategies.

use crate::page::PageContext;
use crate::patterns::SCOPE_WORDS;
use crate::record::DatasetRecord;

/// Fill `location` with the first scope word found.
///
/// Title and description are checked before the page text, and scope words
/// are tried in vocabulary order within each.
#[must_use]
pub fn extract_spatial(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if !record.location.is_empty() {
        return record;
    }

    let summary = format!("{} {}", record.layer_name, record.description);
    if let Some(scope) = scope_word(&summary).or_else(|| scope_word(&ctx.text_lower)) {
        tracing::debug!(scope, "spatial scope");
        record.location = scope.to_string();
    }
    record
}

/// First scope word present in `text` as a whole word.
#[must_use]
pub fn scope_word(text: &str) -> Option<&'static str> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    SCOPE_WORDS
        .iter()
        .copied()
        .find(|scope| words.iter().any(|w| w == scope))
}
