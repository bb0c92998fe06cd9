//! URL Utility Functions
//!
//! Resolution of scraped hrefs against a page URL, host matching for the
//! domain lists, and the normalization used as the visited-set key.

use url::Url;

/// Schemes a discovered link may resolve to.
const FOLLOWABLE_SCHEMES: &[&str] = &["http", "https", "file"];

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a page or base URL. Accepts http(s) and `file:` URLs.
#[must_use]
pub fn parse_base(url_str: &str) -> Option<Url> {
    let url = Url::parse(url_str.trim()).ok()?;
    FOLLOWABLE_SCHEMES.contains(&url.scheme()).then_some(url)
}

/// Resolve an href against the page it was found on.
///
/// Returns `None` for empty hrefs, non-followable schemes (`mailto:`,
/// `javascript:` ...) and hrefs that cannot be joined.
#[must_use]
pub fn resolve_href(href: &str, base: Option<&Url>) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };

    FOLLOWABLE_SCHEMES
        .contains(&resolved.scheme())
        .then_some(resolved)
}

/// Host of an absolute or protocol-relative URL, lowercased. A leading
/// `www.` is kept.
#[must_use]
pub fn host_of(href: &str) -> Option<String> {
    let href = href.trim();
    let url = if href.starts_with("//") {
        Url::parse(&format!("https:{href}")).ok()?
    } else {
        Url::parse(href).ok()?
    };
    url.host_str().map(str::to_ascii_lowercase)
}

/// Whether `host` equals `domain` or is one of its subdomains.
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Normalize a URL by removing fragments and the trailing slash.
///
/// Used as the visited-set key, so `.../LANDSAT#bands` and `.../LANDSAT/`
/// collapse to one entry.
#[must_use]
pub fn normalize_url(url_str: &str) -> String {
    let Some(mut url) = parse_base(url_str) else {
        return url_str.trim().to_string();
    };

    url.set_fragment(None);

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(&path[..path.len() - 1]);
    }

    url.to_string()
}

/// Path of a URL-ish string without query or fragment, lowercased.
///
/// Works for relative hrefs too.
#[must_use]
pub fn path_of(href: &str) -> String {
    let href = href.trim();
    let without_fragment = href.split('#').next().unwrap_or(href);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);

    match Url::parse(without_query) {
        Ok(url) if url.has_host() || url.scheme() == "file" => url.path().to_ascii_lowercase(),
        _ => without_query.to_ascii_lowercase(),
    }
}
