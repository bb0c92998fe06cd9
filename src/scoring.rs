//! Confidence, completeness and quality scoring.
//!
//! Two independent point systems. Confidence weighs the fields that show a
//! page really describes a dataset; quality measures how richly it is
//! described. Completeness is a plain fraction of the key fields.

use serde::{Deserialize, Serialize};

use crate::extractors::normalize_date;
use crate::patterns::{DOI, TECHNICAL_TERMS};
use crate::record::{Confidence, DatasetRecord, Quality};

/// Number of key fields behind `data_completeness`.
pub const KEY_FIELD_COUNT: usize = 8;

// Confidence weights, out of 100.
const LAYER_NAME_POINTS: u32 = 20;
const COMPLETE_DATE_POINTS: u32 = 15;
const PARTIAL_DATE_POINTS: u32 = 7;
const SATELLITE_POINTS: u32 = 15;
const LOCATION_POINTS: u32 = 10;
const CODE_POINTS: u32 = 10;
const PROVIDER_POINTS: u32 = 10;
const TECHNICAL_POINTS: u32 = 10;

const HIGH_CONFIDENCE: u32 = 80;
const MEDIUM_CONFIDENCE: u32 = 50;

const VALIDATION_POINTS: u32 = 5;
const MAX_VALIDATION_POINTS: u32 = 30;
const MAX_QUALITY_POINTS: u32 = 100;

/// Letter band of the quality points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl QualityGrade {
    /// Display form, e.g. `A+`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the key fields are populated.
fn key_fields(record: &DatasetRecord) -> [bool; KEY_FIELD_COUNT] {
    [
        !record.layer_name.is_empty(),
        record.date_range.is_complete(),
        !record.satellites_used.is_empty(),
        !record.location.is_empty(),
        !record.gee_code_snippet.is_empty(),
        !record.dataset_provider.is_empty(),
        record.has_technical_specs(),
        !record.doi.is_empty(),
    ]
}

/// Percentage of key fields populated, in `[0, 100]`.
#[must_use]
pub fn data_completeness(record: &DatasetRecord) -> f64 {
    let filled = key_fields(record).iter().filter(|f| **f).count();
    filled as f64 / KEY_FIELD_COUNT as f64 * 100.0
}

/// Confidence points, out of 100.
#[must_use]
pub fn confidence_points(record: &DatasetRecord) -> u32 {
    let mut points = 0;

    if !record.layer_name.is_empty() {
        points += LAYER_NAME_POINTS;
    }
    if record.date_range.is_complete() {
        points += COMPLETE_DATE_POINTS;
    } else if record.date_range.is_partial() {
        points += PARTIAL_DATE_POINTS;
    }
    if !record.satellites_used.is_empty() {
        points += SATELLITE_POINTS;
    }
    if !record.location.is_empty() {
        points += LOCATION_POINTS;
    }
    if !record.gee_code_snippet.is_empty() {
        points += CODE_POINTS;
    }
    if !record.dataset_provider.is_empty() {
        points += PROVIDER_POINTS;
    }
    if record.has_technical_specs() {
        points += TECHNICAL_POINTS;
    }

    points
}

/// Confidence band for a record.
#[must_use]
pub fn extraction_confidence(record: &DatasetRecord) -> Confidence {
    match confidence_points(record) {
        p if p >= HIGH_CONFIDENCE => Confidence::High,
        p if p >= MEDIUM_CONFIDENCE => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Distinct technical terms in `text`.
fn technical_term_count(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let count = TECHNICAL_TERMS.iter().filter(|term| lower.contains(*term)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Passed validation checks: parseable date, DOI shape, bands, pixel size,
/// code sample, citations.
fn validation_checks(record: &DatasetRecord) -> u32 {
    let doi_ok = DOI
        .find(&record.doi)
        .is_some_and(|m| m.start() == 0 && m.end() == record.doi.len());

    let checks = [
        normalize_date(&record.date_range.start).is_some(),
        doi_ok,
        !record.band_information.is_empty(),
        !record.pixel_size.is_empty(),
        !record.gee_code_snippet.is_empty(),
        !record.citations.is_empty(),
    ];
    let passed = checks.iter().filter(|c| **c).count();
    u32::try_from(passed).unwrap_or(0)
}

/// Quality points, out of 100.
#[must_use]
pub fn quality_points(record: &DatasetRecord) -> u32 {
    let mut points = 0;

    let title = record.layer_name.trim();
    if !title.is_empty() {
        points += 10;
        if title.len() >= 10 {
            points += 5;
        }
        if technical_term_count(title) > 0 {
            points += 5;
        }
    }

    let description = record.description.trim();
    if description.len() >= 50 {
        points += 10;
    }
    if description.len() >= 150 {
        points += 5;
    }
    points += (technical_term_count(description) * 2).min(10);

    points += match record.category_tags.len() {
        0 => 0,
        1 | 2 => 5,
        _ => 10,
    };

    if !record.dataset_provider.is_empty() {
        points += 10;
    }
    if !record.classification.is_empty() {
        points += 10;
    }

    points += (validation_checks(record) * VALIDATION_POINTS).min(MAX_VALIDATION_POINTS);

    points.min(MAX_QUALITY_POINTS)
}

/// Quality band for a record.
#[must_use]
pub fn extraction_quality(record: &DatasetRecord) -> Quality {
    match quality_points(record) {
        p if p >= 85 => Quality::Excellent,
        p if p >= 65 => Quality::Good,
        p if p >= 40 => Quality::Fair,
        _ => Quality::Poor,
    }
}

/// Letter grade for quality points.
#[must_use]
pub fn grade_for_points(points: u32) -> QualityGrade {
    match points {
        p if p >= 95 => QualityGrade::APlus,
        p if p >= 85 => QualityGrade::A,
        p if p >= 70 => QualityGrade::B,
        p if p >= 55 => QualityGrade::C,
        p if p >= 40 => QualityGrade::D,
        _ => QualityGrade::F,
    }
}

/// Letter grade for a record. Placeholders grade `F`.
#[must_use]
pub fn quality_grade(record: &DatasetRecord) -> QualityGrade {
    if record.is_placeholder() {
        return QualityGrade::F;
    }
    grade_for_points(quality_points(record))
}

/// Fill the three derived fields. Placeholders keep zero scores.
pub fn score_record(record: &mut DatasetRecord) {
    if record.is_placeholder() {
        record.extraction_confidence = Confidence::Low;
        record.data_completeness = 0.0;
        record.extraction_quality = Quality::Poor;
        return;
    }

    record.data_completeness = data_completeness(record);
    record.extraction_confidence = extraction_confidence(record);
    record.extraction_quality = extraction_quality(record);
}
