//! Character decoding for fetched catalog pages.
//!
//! Fetchers hand over raw bytes. The charset is taken from, in order: a byte
//! order mark, the HTTP `Content-Type` header, `<meta charset>`, and
//! `<meta http-equiv="Content-Type">`. UTF-8 is the default.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Match `charset=...` inside a header value or `http-equiv` content attribute
#[allow(clippy::expect_used)]
static CHARSET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Pick the encoding of a page.
///
/// Only the first 1024 bytes are searched for meta declarations.
#[must_use]
pub fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = content_type.and_then(charset_param).and_then(label_to_encoding) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    CHARSET_META_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| label_to_encoding(m.as_str()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD rather than errors.
///
/// # Examples
///
/// ```
/// use ee_catalog_crawler::encoding::decode_page;
///
/// let html = b"<html><body>Landsat 8</body></html>";
/// assert!(decode_page(html, None).contains("Landsat 8"));
/// ```
#[must_use]
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, content_type);
    // decode() strips a BOM when present
    let (decoded, _encoding_used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}

fn charset_param(value: &str) -> Option<&str> {
    CHARSET_PARAM_RE
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn label_to_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}
