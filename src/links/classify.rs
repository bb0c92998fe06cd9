//! Junk detection, link typing and priority scoring.
//!
//! All functions here are pure: the same `(href, text)` pair always yields
//! the same answer, and malformed input degrades to `General` / priority 0.

use crate::patterns::{
    AD_TRACKING, BROKEN_HREFS, COVERAGE_VOCABULARY, DATASET_PATH_MARKERS, DATASET_VOCABULARY,
    DOCUMENTATION_VOCABULARY, JUNK_DOMAINS, JUNK_EXACT_HOSTS, NAVIGATION_WORDS,
    PRIORITY_DATASET_TERMS, PRIORITY_DOCUMENTATION_TERMS, PRIORITY_IMAGERY_TERMS,
    PRIORITY_SATELLITE_TERMS, SATELLITE_INFO_VOCABULARY, SOCIAL_DOMAINS, SOCIAL_PHRASES,
    TAG_PATH_MARKERS, TECHNICAL_VOCABULARY, UTILITY_PHRASES,
};
use crate::url_utils::{host_matches, host_of, path_of};

use super::{JunkReason, LinkClassification, LinkType};

/// Terms shorter than this must match a whole token; longer ones may prefix it.
const PREFIX_MATCH_MIN_LEN: usize = 5;

/// Priority weights.
const DATASET_TERM_WEIGHT: u32 = 10;
const SATELLITE_TERM_WEIGHT: u32 = 8;
const IMAGERY_TERM_WEIGHT: u32 = 6;
const DOCUMENTATION_TERM_WEIGHT: u32 = 3;
const DATASET_PATH_BONUS: u32 = 5;

/// Split into lowercase alphanumeric tokens.
///
/// `LANDSAT_LC08_C02` becomes `landsat`, `lc08`, `c02`.
fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn has_term(tokens: &[String], terms: &[&str]) -> bool {
    terms.iter().any(|term| {
        tokens.iter().any(|tok| {
            tok == term || (term.len() >= PREFIX_MATCH_MIN_LEN && tok.starts_with(term))
        })
    })
}

fn combined_tokens(href: &str, text: &str) -> Vec<String> {
    let mut all = tokens(href);
    all.extend(tokens(text));
    all
}

/// Whether href or text carries technical/provider vocabulary.
///
/// This is the override that keeps dataset pages hosted on generic
/// infrastructure, or carrying tracking parameters, out of the junk bin.
#[must_use]
pub fn looks_like_dataset_link(href: &str, text: &str) -> bool {
    has_term(&combined_tokens(href, text), DATASET_VOCABULARY)
}

// === Junk predicates ===

fn is_broken(href: &str) -> bool {
    let compact: String = href.chars().filter(|c| !c.is_whitespace()).collect();
    BROKEN_HREFS.iter().any(|b| compact.eq_ignore_ascii_case(b))
}

fn is_navigation(href: &str, text: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href == "/" || href.starts_with('#') {
        return true;
    }
    NAVIGATION_WORDS.is_match(&path_of(href)) || NAVIGATION_WORDS.is_match(text.trim())
}

fn is_social(href: &str, text: &str) -> bool {
    let on_social_domain = host_of(href).is_some_and(|host| {
        SOCIAL_DOMAINS.iter().any(|domain| host_matches(&host, domain))
    });
    on_social_domain || SOCIAL_PHRASES.is_match(text)
}

fn has_non_http_scheme(href: &str) -> bool {
    let href = href.trim();
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let valid_scheme = !scheme.is_empty()
        && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid_scheme && !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
}

fn is_utility(href: &str, text: &str) -> bool {
    has_non_http_scheme(href) || UTILITY_PHRASES.is_match(text)
}

fn is_advertisement(href: &str, text: &str) -> bool {
    AD_TRACKING.is_match(href) || AD_TRACKING.is_match(text)
}

fn is_external_junk(href: &str) -> bool {
    host_of(href).is_some_and(|host| {
        JUNK_EXACT_HOSTS.contains(&host.as_str())
            || JUNK_DOMAINS.iter().any(|domain| host_matches(&host, domain))
    })
}

/// First junk predicate that matches, if any.
#[must_use]
pub fn junk_reason(href: &str, text: &str) -> Option<JunkReason> {
    if is_broken(href) {
        return Some(JunkReason::Broken);
    }
    if is_navigation(href, text) {
        return Some(JunkReason::Navigation);
    }
    if is_social(href, text) {
        return Some(JunkReason::SocialMedia);
    }
    if is_utility(href, text) {
        return Some(JunkReason::Utility);
    }

    let dataset_like = looks_like_dataset_link(href, text);
    if !dataset_like && is_advertisement(href, text) {
        return Some(JunkReason::Advertisement);
    }
    if !dataset_like && is_external_junk(href) {
        return Some(JunkReason::ExternalDomain);
    }

    None
}

/// Whether the link should be excluded from the candidate set.
#[must_use]
pub fn is_junk_link(href: &str, text: &str) -> bool {
    junk_reason(href, text).is_some()
}

// === Typing and priority ===

/// Link type by first match: satellite_info, dataset_detail (or tag_page),
/// data_coverage, documentation, technical, general.
#[must_use]
pub fn link_type_for(href: &str, text: &str) -> LinkType {
    let path = path_of(href);
    let all = combined_tokens(&path, text);

    if has_term(&all, SATELLITE_INFO_VOCABULARY) {
        return LinkType::SatelliteInfo;
    }

    let padded = format!("{}/", path.trim_end_matches('/'));
    if TAG_PATH_MARKERS.iter().any(|m| padded.contains(m)) {
        return LinkType::TagPage;
    }
    if DATASET_PATH_MARKERS.iter().any(|m| padded.contains(m)) && !is_catalog_root(&path) {
        return LinkType::DatasetDetail;
    }

    if has_term(&all, COVERAGE_VOCABULARY) {
        return LinkType::DataCoverage;
    }
    if has_term(&all, DOCUMENTATION_VOCABULARY) {
        return LinkType::Documentation;
    }
    if has_term(&all, TECHNICAL_VOCABULARY) {
        return LinkType::Technical;
    }

    LinkType::General
}

/// `/datasets` or `/datasets/catalog` with nothing after it.
fn is_catalog_root(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    ["/datasets", "/datasets/catalog", "/catalog"]
        .iter()
        .any(|suffix| trimmed.ends_with(suffix))
}

/// Additive priority. Only orders processing, never excludes.
#[must_use]
pub fn extraction_priority(href: &str, text: &str) -> u32 {
    let path = path_of(href);
    let href_tokens = tokens(&path);
    let all = combined_tokens(&path, text);

    let mut priority = 0;
    if has_term(&href_tokens, PRIORITY_DATASET_TERMS) {
        priority += DATASET_TERM_WEIGHT;
    }
    if has_term(&all, PRIORITY_SATELLITE_TERMS) {
        priority += SATELLITE_TERM_WEIGHT;
    }
    if has_term(&all, PRIORITY_IMAGERY_TERMS) {
        priority += IMAGERY_TERM_WEIGHT;
    }
    if has_term(&all, PRIORITY_DOCUMENTATION_TERMS) {
        priority += DOCUMENTATION_TERM_WEIGHT;
    }
    if path.contains("/datasets/") || path.contains("/collections/") {
        priority += DATASET_PATH_BONUS;
    }
    priority
}

/// Full classification of one anchor.
#[must_use]
pub fn classify_link(href: &str, text: &str) -> LinkClassification {
    match junk_reason(href, text) {
        Some(reason) => LinkClassification::Junk(reason),
        None => LinkClassification::Candidate {
            link_type: link_type_for(href, text),
            priority: extraction_priority(href, text),
        },
    }
}
