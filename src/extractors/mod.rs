//! Field extractors.
//!
//! One module per field family, each the single place its patterns are
//! applied. Every extractor takes the page context and a record by value
//! and returns the record with only its still-empty fields filled, so
//! extractors can be chained in any order and the first source wins.

pub mod citation;
pub mod code_snippet;
pub mod descriptive;
pub mod provider;
pub mod satellites;
pub mod spatial;
pub mod technical;
pub mod temporal;
pub mod thumbnails;

use crate::page::PageContext;
use crate::record::DatasetRecord;

pub use citation::extract_citation;
pub use code_snippet::extract_code_snippet;
pub use descriptive::extract_descriptive;
pub use provider::extract_provider;
pub use satellites::extract_satellites;
pub use spatial::extract_spatial;
pub use technical::extract_technical;
pub use temporal::{extract_temporal, normalize_date};
pub use thumbnails::extract_thumbnails;

/// Signature shared by all field extractors.
pub type Extractor = fn(&PageContext, DatasetRecord) -> DatasetRecord;

/// Gap-fill from JSON-LD and meta tags collected with the page.
#[must_use]
pub fn extract_structured(ctx: &PageContext, record: DatasetRecord) -> DatasetRecord {
    crate::metadata::apply_structured(&ctx.structured, record, ctx.base.as_ref())
}

/// Run `extractors` in order.
#[must_use]
pub fn run_chain(ctx: &PageContext, record: DatasetRecord, extractors: &[Extractor]) -> DatasetRecord {
    extractors.iter().fold(record, |record, extract| extract(ctx, record))
}
