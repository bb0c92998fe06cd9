//! Temporal coverage.
//!
//! The availability section is searched before the page as a whole. Within
//! each scope the patterns run from most to least precise: ISO timestamps,
//! plain dates, then bare years.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::dom;
use crate::page::PageContext;
use crate::patterns::{DATE_RANGE, ISO_DATE_RANGE, SINGLE_DATE, YEAR_RANGE};
use crate::record::{DateRange, DatasetRecord};

/// Literal end of an ongoing coverage.
pub const OPEN_END: &str = "Present";

const AVAILABILITY_LABELS: &[&str] = &[
    "Dataset Availability",
    "Availability",
    "Temporal Coverage",
    "Temporal Extent",
    "Date Range",
];

const OPEN_END_TOKENS: &[&str] = &["present", "now", "ongoing", "current"];

/// Fill `date_range` when it is still empty.
#[must_use]
pub fn extract_temporal(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if record.date_range.is_complete() {
        return record;
    }

    let section = dom::labeled_value(&ctx.doc, AVAILABILITY_LABELS);

    let found = section
        .as_deref()
        .and_then(match_range)
        .or_else(|| match_range(&ctx.text))
        .or_else(|| {
            // A lone date is only trusted under an availability label
            let caps = SINGLE_DATE.captures(section.as_deref()?)?;
            Some(DateRange {
                start: normalize_date(caps.get(1)?.as_str())?,
                end: String::new(),
            })
        });

    if let Some(range) = found {
        tracing::debug!(start = %range.start, end = %range.end, "temporal coverage");
        record.date_range = merge_range(std::mem::take(&mut record.date_range), range);
    }
    record
}

/// Fill the empty side of `current` from `found`.
///
/// A one-sided structured date (usually a publication date) that would
/// invert the range gives way to the page's own coverage.
fn merge_range(current: DateRange, found: DateRange) -> DateRange {
    if current.is_empty() {
        return found;
    }

    let merged = DateRange {
        start: if current.start.is_empty() { found.start.clone() } else { current.start },
        end: if current.end.is_empty() { found.end.clone() } else { current.end },
    };

    let inverted = merged.is_complete() && merged.end != OPEN_END && merged.start > merged.end;
    if inverted && found.is_complete() {
        found
    } else {
        merged
    }
}

/// First date range in `text`, most precise pattern first.
#[must_use]
pub fn match_range(text: &str) -> Option<DateRange> {
    [&*ISO_DATE_RANGE, &*DATE_RANGE, &*YEAR_RANGE]
        .into_iter()
        .find_map(|re| range_from(re, text))
}

/// Group 1 is the start; group 2 the end, or group 3 an open-end token.
fn range_from(re: &Regex, text: &str) -> Option<DateRange> {
    let caps = re.captures(text)?;
    let start = normalize_date(caps.get(1)?.as_str())?;
    let end = caps
        .get(2)
        .or_else(|| caps.get(3))
        .and_then(|m| normalize_date(m.as_str()))
        .unwrap_or_default();
    Some(DateRange { start, end })
}

/// Normalize a date token to `YYYY-MM-DD`.
///
/// Bare years are kept as `YYYY`; open-end tokens become [`OPEN_END`].
/// Returns `None` for anything unparseable.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if OPEN_END_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        return Some(OPEN_END.to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date().format("%Y-%m-%d").to_string());
    }

    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    // Timestamps with fractional or odd suffixes: keep the date part
    if let Some(date) = raw.get(..10).and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()) {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return Some(raw.to_string());
    }

    None
}
