//! Dataset record types produced by extraction.
//!
//! Every field of [`DatasetRecord`] defaults to an empty string, list or
//! struct. Consumers can iterate or compare without existence checks, and the
//! JSON output never contains `null`.

use serde::{Deserialize, Serialize};

use crate::links::Thumbnail;

/// Layer name used for records produced when extraction failed entirely.
pub const PLACEHOLDER_LAYER_NAME: &str = "No data available";

/// Temporal coverage of a dataset.
///
/// Both ends are ISO-ish date strings (`YYYY-MM-DD` or a bare year). An
/// ongoing dataset keeps the literal `Present` token as its end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the coverage.
    pub start: String,
    /// End of the coverage.
    pub end: String,
}

impl DateRange {
    /// Both ends are populated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }

    /// At least one end is populated.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }

    /// Neither end is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_partial()
    }
}

/// How sure the scorer is that the record describes a real dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Fewer than 50 confidence points.
    #[default]
    Low,
    /// 50 to 79 points.
    Medium,
    /// 80 points or more.
    High,
}

impl Confidence {
    /// Serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// How rich the extracted metadata is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Little more than a name.
    #[default]
    Poor,
    /// Some descriptive or technical fields.
    Fair,
    /// Most fields, validated.
    Good,
    /// Fully described dataset.
    Excellent,
}

impl Quality {
    /// Serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

/// The structured output row describing one Earth-observation dataset.
///
/// Field order matches the JSON output shape; `source_url` and
/// `classification` are appended after the scored fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetRecord {
    /// Dataset title. Used with `source_url` for deduplication.
    pub layer_name: String,

    /// Temporal coverage.
    pub date_range: DateRange,

    /// Missions/sensors mentioned by the page (Landsat 8, Sentinel-2, ...).
    pub satellites_used: Vec<String>,

    /// Coarse spatial scope (global, continental, regional, local) or a place.
    pub location: String,

    /// First Earth Engine code sample found on the page.
    pub gee_code_snippet: String,

    /// Preview images.
    pub thumbnails: Vec<Thumbnail>,

    /// One entry per band: name plus whatever description the table offered.
    pub band_information: Vec<String>,

    /// Keyword tags, deduplicated, first-seen order.
    pub category_tags: Vec<String>,

    /// Organization providing the data.
    pub dataset_provider: String,

    /// Spatial resolution as written on the page, e.g. `30 meters`.
    pub pixel_size: String,

    /// Citation texts.
    pub citations: Vec<String>,

    /// Free-text description.
    pub description: String,

    /// License or terms text.
    pub terms_of_use: String,

    /// DOI, without any `https://doi.org/` prefix.
    pub doi: String,

    /// Derived by the scorer.
    pub extraction_confidence: Confidence,

    /// Percentage of key fields populated, in `[0, 100]`.
    pub data_completeness: f64,

    /// Derived by the scorer.
    pub extraction_quality: Quality,

    /// URL the record was extracted from.
    pub source_url: String,

    /// Theme assigned by an enrichment strategy (optical, radar, ...).
    pub classification: String,
}

impl DatasetRecord {
    /// Empty record bound to a source URL.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// Record returned when a page could not be extracted at all.
    #[must_use]
    pub fn placeholder(source_url: impl Into<String>) -> Self {
        Self {
            layer_name: PLACEHOLDER_LAYER_NAME.to_string(),
            ..Self::new(source_url)
        }
    }

    /// Whether this is the failure placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.layer_name == PLACEHOLDER_LAYER_NAME
    }

    /// Add a tag unless an equal tag (ignoring case) is already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if !self.category_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            self.category_tags.push(tag.to_string());
        }
    }

    /// Add a satellite name unless already present.
    pub fn add_satellite(&mut self, name: &str) {
        if !self.satellites_used.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            self.satellites_used.push(name.to_string());
        }
    }

    /// Bands or pixel size are known.
    #[must_use]
    pub fn has_technical_specs(&self) -> bool {
        !self.pixel_size.is_empty() || !self.band_information.is_empty()
    }
}
