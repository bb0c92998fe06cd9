//! Enrichment strategies.
//!
//! An [`EnricherRegistry`] holds a ranked list of strategies. Each one looks
//! at a finished record plus the page text and may propose a theme, tags or
//! a location. Proposals only fill fields that are still empty, and for each
//! field the highest-ranked strategy that offers it wins.
//!
//! Model-backed classifiers plug in by implementing [`Enricher`]; the
//! built-ins are keyword and gazetteer lookups.

use crate::record::DatasetRecord;

/// What a strategy proposes for a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    /// Dataset theme, e.g. `optical` or `elevation`.
    pub classification: Option<String>,
    /// Extra tags.
    pub tags: Vec<String>,
    /// Spatial coverage.
    pub location: Option<String>,
}

/// A ranked enrichment strategy.
pub trait Enricher {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Propose values for `record`, or `None` when nothing applies.
    fn enrich(&self, record: &DatasetRecord, text: &str) -> Option<EnrichmentResult>;
}

/// Strategies in rank order.
#[derive(Default)]
pub struct EnricherRegistry {
    strategies: Vec<Box<dyn Enricher + Send + Sync>>,
}

impl std::fmt::Debug for EnricherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnricherRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

impl EnricherRegistry {
    /// Empty registry; enrichment becomes a no-op.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyword classifier first, then the gazetteer.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(KeywordClassifier);
        registry.register(PlaceNameGeocoder);
        registry
    }

    /// Append a strategy at the lowest rank.
    pub fn register(&mut self, strategy: impl Enricher + Send + Sync + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Number of strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// No strategies registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy names in rank order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy and merge the proposals into `record`.
    #[must_use]
    pub fn apply(&self, mut record: DatasetRecord, text: &str) -> DatasetRecord {
        let mut tags_taken = false;

        for strategy in &self.strategies {
            let Some(result) = strategy.enrich(&record, text) else {
                continue;
            };
            tracing::debug!(strategy = strategy.name(), ?result, "enrichment");

            if record.classification.is_empty() {
                if let Some(classification) = result.classification {
                    record.classification = classification;
                }
            }
            if record.location.is_empty() {
                if let Some(location) = result.location {
                    record.location = location;
                }
            }
            if !tags_taken && !result.tags.is_empty() {
                for tag in &result.tags {
                    record.add_tag(tag);
                }
                tags_taken = true;
            }
        }

        record
    }
}

/// Lowercase alphanumeric words joined by single spaces, padded.
fn word_text(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

fn has_phrase(padded: &str, phrase: &str) -> bool {
    padded.contains(&format!(" {phrase} "))
}

/// Themes and the phrases that indicate them, in tie-break order.
const THEMES: &[(&str, &[&str])] = &[
    ("elevation", &["elevation", "dem", "terrain", "srtm", "topography", "bathymetry"]),
    ("radar", &["sar", "radar", "backscatter", "sentinel 1", "palsar", "polarization", "interferometric"]),
    ("optical", &["reflectance", "multispectral", "optical", "landsat", "sentinel 2", "toa", "rgb", "hyperspectral"]),
    ("land cover", &["land cover", "landcover", "land use", "forest", "cropland", "urban", "impervious"]),
    ("vegetation", &["ndvi", "evi", "vegetation", "leaf area", "lai", "gpp", "phenology"]),
    ("climate", &["temperature", "precipitation", "climate", "reanalysis", "era5", "weather", "evapotranspiration"]),
    ("atmosphere", &["aerosol", "ozone", "no2", "methane", "co2", "air quality", "cloud"]),
    ("ocean", &["ocean", "sea surface", "chlorophyll", "marine", "coastal", "sea ice"]),
    ("water", &["surface water", "river", "lake", "flood", "wetland", "soil moisture"]),
];

/// Assigns a dataset theme by counting theme phrases.
///
/// Name, description and tags count double against the page text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Best theme with its score, `None` when no phrase matched.
    #[must_use]
    pub fn classify(record: &DatasetRecord, text: &str) -> Option<(&'static str, usize)> {
        let summary = word_text(&format!(
            "{} {} {}",
            record.layer_name,
            record.description,
            record.category_tags.join(" ")
        ));
        let body = word_text(text);

        let mut best: Option<(&'static str, usize)> = None;
        for &(theme, phrases) in THEMES {
            let score: usize = phrases
                .iter()
                .map(|p| 2 * usize::from(has_phrase(&summary, p)) + usize::from(has_phrase(&body, p)))
                .sum();
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((theme, score));
            }
        }
        best
    }
}

impl Enricher for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword_classifier"
    }

    fn enrich(&self, record: &DatasetRecord, text: &str) -> Option<EnrichmentResult> {
        let (theme, _) = Self::classify(record, text)?;
        Some(EnrichmentResult {
            classification: Some(theme.to_string()),
            tags: vec![theme.to_string()],
            location: None,
        })
    }
}

/// Place names and the location they map to.
const GAZETTEER: &[(&str, &str)] = &[
    ("north america", "North America"),
    ("south america", "South America"),
    ("latin america", "South America"),
    ("africa", "Africa"),
    ("sahel", "Africa"),
    ("europe", "Europe"),
    ("asia", "Asia"),
    ("australia", "Australia"),
    ("oceania", "Oceania"),
    ("antarctica", "Antarctica"),
    ("antarctic", "Antarctica"),
    ("arctic", "Arctic"),
    ("greenland", "Greenland"),
    ("amazon", "South America"),
    ("conus", "United States"),
    ("contiguous united states", "United States"),
    ("united states", "United States"),
    ("alaska", "United States"),
    ("canada", "Canada"),
    ("mexico", "Mexico"),
    ("brazil", "Brazil"),
    ("china", "China"),
    ("india", "India"),
    ("indonesia", "Indonesia"),
    ("japan", "Japan"),
];

/// Fills `location` from place names when no scope word was found.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceNameGeocoder;

impl PlaceNameGeocoder {
    /// First gazetteer entry in `text`, in gazetteer order.
    #[must_use]
    pub fn locate(text: &str) -> Option<&'static str> {
        let padded = word_text(text);
        GAZETTEER
            .iter()
            .find(|(place, _)| has_phrase(&padded, place))
            .map(|(_, location)| *location)
    }
}

impl Enricher for PlaceNameGeocoder {
    fn name(&self) -> &'static str {
        "place_name_geocoder"
    }

    fn enrich(&self, record: &DatasetRecord, text: &str) -> Option<EnrichmentResult> {
        if !record.location.is_empty() {
            return None;
        }
        let summary = format!("{} {}", record.layer_name, record.description);
        let location = Self::locate(&summary).or_else(|| Self::locate(text))?;
        Some(EnrichmentResult {
            location: Some(location.to_string()),
            ..EnrichmentResult::default()
        })
    }
}
