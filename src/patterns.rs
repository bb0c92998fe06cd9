//! Compiled regex patterns and keyword vocabularies.
//!
//! Every date, provider, DOI and band pattern used by the extractors lives
//! here, compiled once with `LazyLock`. Link-classification vocabularies are
//! kept next to them so the keyword lists have a single home.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches runs of whitespace for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Separators between a page title and the site name.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[\|–—·]\s+|\s+-\s+").expect("TITLE_SEPARATOR regex")
});

/// Titles of error pages that must not become a `layer_name`.
pub static ERROR_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\d{3}(?:\s*[-:]?\s*(?:page\s+)?(?:not\s+found|error|forbidden|access\s+denied|server\s+error))?|error(?:\s*\d{3})?|(?:page\s+)?not\s+found|access\s+denied|forbidden)(?:\s*[-|:–].*)?$",
    )
    .expect("ERROR_TITLE regex")
});

// =============================================================================
// Temporal Patterns (most precise first)
// =============================================================================

/// `2013-04-11T00:00:00Z - 2024-01-01T00:00:00Z`, or an open end.
pub static ISO_DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2})T[0-9:.]*Z?\s*(?:-|–|—|to)\s*(?:(\d{4}-\d{2}-\d{2})(?:T[0-9:.]*Z?)?|(present|now|ongoing|current))",
    )
    .expect("ISO_DATE_RANGE regex")
});

/// `2013-04-11 to 2024-01-01`.
pub static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2})\s*(?:to|through|until|-|–|—)\s*(?:(\d{4}-\d{2}-\d{2})\b|(present|now|ongoing|current)\b)",
    )
    .expect("DATE_RANGE regex")
});

/// `1984 - 2012`.
pub static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to|through)\s*((?:19|20)\d{2}|present|now|ongoing|current)\b")
        .expect("YEAR_RANGE regex")
});

/// A single ISO date, only trusted inside an availability section.
pub static SINGLE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}-\d{2}-\d{2})(?:T[0-9:.]*Z?)?").expect("SINGLE_DATE regex")
});

// =============================================================================
// Provider / Citation Patterns
// =============================================================================

/// `Provider: NASA LP DAAC`, `Source: USGS`, `hosted by ECMWF` ...
///
/// The captured name is a run of capitalized words with small connectors.
pub static PROVIDER_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"([A-Z][\w&'’./-]*(?:\s+(?:of|and|for|the|at|de|du|&|[A-Z0-9][\w&'’./-]*)){0,9})";
    Regex::new(&format!(
        r"(?:\b(?i:(?:dataset\s+)?provider|source|organi[sz]ation)\s*:\s*{name})|(?:\b(?i:managed|hosted|provided)\s+(?i:by):?\s+{name})"
    ))
    .expect("PROVIDER_TEXT regex")
});

/// Digital Object Identifier.
pub static DOI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b10\.\d{4,9}/[-._;()/:A-Z0-9]+").expect("DOI regex")
});

// =============================================================================
// Technical Patterns
// =============================================================================

/// `Bands: B1, B2, B3`.
pub static BAND_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbands?\s*:\s*([^.;\n]+)").expect("BAND_LIST regex")
});

/// Labelled resolution, `Pixel Size: 30 meters`, `resolution of 250 m`.
pub static LABELLED_PIXEL_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:pixel\s+size|spatial\s+resolution|resolution)\s*(?::|of|is)?\s*(\d+(?:[.,]\d+)?\s*(?:meters?|metres?|km|kilometers?|kilometres?|m|arc[- ]?seconds?|degrees?))\b",
    )
    .expect("LABELLED_PIXEL_SIZE regex")
});

/// Bare `30 meters` / `1 km`. Bare `m` is not accepted here.
pub static PIXEL_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?\s*(?:meters?|metres?|km|kilometers?|kilometres?))\b")
        .expect("PIXEL_SIZE regex")
});

/// Words that mark a band table header or first cell.
pub static BAND_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bands?|channels?|wavelengths?)\b").expect("BAND_HEADER regex")
});

// =============================================================================
// Page Type Markers
// =============================================================================

/// Strong markers of an individual dataset page.
pub static DETAIL_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:earth engine snippet|dataset availability|dataset provider|citations|doi|bands|pixel size|open in code editor)\b",
    )
    .expect("DETAIL_MARKERS regex")
});

/// Phrases of a catalog index page.
pub static CATALOG_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:earth engine data catalog|dataset catalog|data catalog|browse (?:the )?datasets|catalog index|all datasets)\b")
        .expect("CATALOG_MARKERS regex")
});

/// Phrases of a satellite/mission overview page.
pub static SATELLITE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:satellite mission|satellite information|launch date|launched|orbit(?:al)? (?:altitude|period)|spacecraft|sensor specifications|instruments? on board|mission overview)\b",
    )
    .expect("SATELLITE_MARKERS regex")
});

/// Mission and sensor names.
///
/// Group 1 is a Landsat number, group 2 a Sentinel number, group 3 any
/// other mission written as it appears.
pub static SATELLITE_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?i:landsat)[\s-]?(\d{1,2})|(?i:sentinel)[\s-]?(\d)[A-Da-d]?|(MODIS|VIIRS|ASTER|SRTM|AVHRR|PALSAR-?2?|ALOS|GEDI|ICESat-2|SMAP|GPM|TRMM|GOES-\d{1,2}|Suomi NPP|PlanetScope|NAIP|Terra|Aqua))\b",
    )
    .expect("SATELLITE_NAMES regex")
});

// =============================================================================
// Spatial Scope
// =============================================================================

/// Closed scope vocabulary in priority order.
pub const SCOPE_WORDS: &[&str] = &["global", "continental", "regional", "local"];

// =============================================================================
// Link Classification Vocabularies
// =============================================================================

/// Navigation words matched on word boundaries against href and text.
pub static NAVIGATION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:home|homepage|about|about us|contact|contact us|help|faq|support|login|log in|logout|log out|sign in|sign up|signin|signup|register|privacy|terms of service|cookies?|careers|jobs|menu|search|sitemap|feedback|settings|account|back|next|previous|skip to (?:main )?content)\b",
    )
    .expect("NAVIGATION_WORDS regex")
});

/// Social call-to-action phrases in link text.
pub static SOCIAL_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:follow us|follow|share|share on|share this|tweet|retweet|like us|connect with us|join us)\b")
        .expect("SOCIAL_PHRASES regex")
});

/// Utility actions in link text.
pub static UTILITY_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:print|print this|download|bookmark|subscribe|rss|copy link|email this|back to top|expand all|collapse all)\b")
        .expect("UTILITY_PHRASES regex")
});

/// Advertisement and tracking markers in href or text.
pub static AD_TRACKING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[?&](?:utm_[a-z]+|gclid|fbclid|mc_eid|mc_cid|msclkid)=|doubleclick|googlesyndication|googleadservices|adservice|/ads?/|\bsponsored\b|\badvert(?:isement)?s?\b|\baffiliate\b|\bpromo(?:tion)?\b)",
    )
    .expect("AD_TRACKING regex")
});

/// Placeholder hrefs.
pub const BROKEN_HREFS: &[&str] = &[
    "#",
    "#!",
    "javascript:void(0)",
    "javascript:void(0);",
    "javascript:;",
    "javascript:",
    "about:blank",
];

/// Social platforms, matched against the host and its parents.
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com", "fb.com", "twitter.com", "x.com", "t.co", "instagram.com",
    "linkedin.com", "youtube.com", "youtu.be", "pinterest.com", "reddit.com",
    "tiktok.com", "tumblr.com", "mastodon.social", "threads.net",
];

/// Non-dataset external domains, matched against the host and its parents.
pub const JUNK_DOMAINS: &[&str] = &[
    "wikipedia.org", "wikimedia.org", "amazon.com", "ebay.com", "bing.com",
    "yahoo.com", "duckduckgo.com", "baidu.com", "yandex.com", "yandex.ru",
    "apple.com", "play.google.com",
];

/// Hosts that are junk only when matched exactly (their subdomains host data).
pub const JUNK_EXACT_HOSTS: &[&str] = &["google.com", "www.google.com"];

/// Technical/provider vocabulary that marks a link as dataset-like.
pub const DATASET_VOCABULARY: &[&str] = &[
    "satellite", "sensor", "landsat", "sentinel", "modis", "copernicus", "nasa",
    "esa", "usgs", "noaa", "jaxa", "ecmwf", "dataset", "collection", "imagery",
    "viirs", "aster", "srtm", "goes", "avhrr", "era5", "chirps", "naip",
    "elevation", "reflectance", "radiance", "raster",
];

/// Markers of satellite/mission overview links.
pub const SATELLITE_INFO_VOCABULARY: &[&str] =
    &["satellite", "satellites", "mission", "missions", "spacecraft", "platform", "instrument"];

/// Path segments of dataset/catalog detail links.
pub const DATASET_PATH_MARKERS: &[&str] = &[
    "/catalog/", "/dataset/", "/datasets/", "/product/", "/products/", "/collection/", "/collections/",
];

/// Tag listing path segments.
pub const TAG_PATH_MARKERS: &[&str] = &["/tags/", "/tag/"];

/// Data coverage vocabulary.
pub const COVERAGE_VOCABULARY: &[&str] =
    &["coverage", "availability", "temporal", "spatial", "extent", "region", "map"];

/// Documentation vocabulary.
pub const DOCUMENTATION_VOCABULARY: &[&str] = &[
    "docs", "documentation", "guide", "guides", "tutorial", "tutorials", "reference",
    "api", "manual", "readme", "handbook",
];

/// Technical vocabulary.
pub const TECHNICAL_VOCABULARY: &[&str] = &[
    "band", "bands", "resolution", "specification", "specifications", "spectral",
    "wavelength", "algorithm", "atbd", "technical", "calibration", "processing",
];

/// Priority keywords, dataset tier (href only).
pub const PRIORITY_DATASET_TERMS: &[&str] = &["dataset", "collection", "product", "catalog"];

/// Priority keywords, satellite tier.
pub const PRIORITY_SATELLITE_TERMS: &[&str] = &[
    "satellite", "sensor", "landsat", "sentinel", "modis", "viirs", "aster", "goes",
    "avhrr", "copernicus",
];

/// Priority keywords, imagery tier.
pub const PRIORITY_IMAGERY_TERMS: &[&str] =
    &["imagery", "image", "images", "data", "raster", "mosaic", "composite"];

/// Priority keywords, documentation tier.
pub const PRIORITY_DOCUMENTATION_TERMS: &[&str] =
    &["documentation", "docs", "guide", "tutorial", "reference"];

// =============================================================================
// Quality Scoring Vocabulary
// =============================================================================

/// Technical terms counted for description density.
pub const TECHNICAL_TERMS: &[&str] = &[
    "band", "resolution", "reflectance", "spectral", "sensor", "satellite", "pixel",
    "wavelength", "radiance", "calibration", "orbit", "algorithm", "atmospheric",
    "temporal", "spatial", "surface", "imagery", "raster", "product",
];

// =============================================================================
// CSS Selectors
// =============================================================================

/// Elements that can act as a field label.
pub const LABEL_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, dt, th, td, strong, b, label, span, div, p, li";

/// Main content containers, most specific first.
pub const MAIN_SELECTOR: &str = "main, article, [role='main'], .devsite-article-body, #content, .content";

/// Code sample containers.
pub const CODE_SELECTOR: &str = "pre, code";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_range_with_present_end() {
        let caps = ISO_DATE_RANGE.captures("Dataset Availability 2013-04-11T00:00:00Z - Present");
        let caps = caps.expect("ISO range should match");
        assert_eq!(&caps[1], "2013-04-11");
        assert!(caps.get(2).is_none());
        assert_eq!(&caps[3], "Present");
    }

    #[test]
    fn iso_range_closed() {
        let caps = ISO_DATE_RANGE
            .captures("2000-02-24T00:00:00Z–2023-02-18T00:00:00Z")
            .expect("closed ISO range");
        assert_eq!(&caps[1], "2000-02-24");
        assert_eq!(&caps[2], "2023-02-18");
    }

    #[test]
    fn year_range_does_not_match_dates() {
        assert!(!YEAR_RANGE.is_match("2013-04-11"));
        assert!(YEAR_RANGE.is_match("1984 - 2012"));
    }

    #[test]
    fn provider_captures_capitalized_phrase() {
        let caps = PROVIDER_TEXT
            .captures("Provider: United States Geological Survey and more text")
            .expect("provider");
        let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        assert_eq!(name, Some("United States Geological Survey and"));
    }

    #[test]
    fn doi_matches_case_insensitively() {
        let m = DOI.find("doi:10.5067/MODIS/MOD13Q1.061 see").expect("doi");
        assert_eq!(m.as_str(), "10.5067/MODIS/MOD13Q1.061");
    }

    #[test]
    fn detail_markers_use_word_boundaries() {
        assert!(!DETAIL_MARKERS.is_match("we are doing things"));
        assert!(DETAIL_MARKERS.is_match("see the DOI below"));
    }

    #[test]
    fn navigation_words_skip_substrings() {
        assert!(!NAVIGATION_WORDS.is_match("research products"));
        assert!(NAVIGATION_WORDS.is_match("Search"));
    }

    #[test]
    fn error_titles() {
        for title in ["404", "404 Not Found", "404 - Page not found | Google", "Page Not Found", "Error 500"] {
            assert!(ERROR_TITLE.is_match(title), "{title}");
        }
        for title in ["250m MODIS Vegetation", "Sentinel-2 MSI", "Global Forest Change 2000-2023"] {
            assert!(!ERROR_TITLE.is_match(title), "{title}");
        }
    }

    #[test]
    fn whitespace_normalize_collapses_spaces() {
        let result = WHITESPACE_NORMALIZE.replace_all("Landsat   8\n\tOLI", " ");
        assert_eq!(result, "Landsat 8 OLI");
    }
}
