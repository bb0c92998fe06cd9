use ee_catalog_crawler::links::{extraction_priority, is_junk_link, junk_reason, link_type_for};
use ee_catalog_crawler::{classify_link, discover_links, dom, JunkReason, LinkClassification, LinkType};
use url::Url;

#[test]
fn social_follow_link_is_junk() {
    let classification = classify_link("https://twitter.com/earthengine", "Follow us");
    assert_eq!(classification, LinkClassification::Junk(JunkReason::SocialMedia));
    assert!(classification.is_junk());
}

#[test]
fn catalog_detail_link_is_high_priority_candidate() {
    let href = "/datasets/catalog/LANDSAT_LC08_C02_T1_L2";
    let text = "Landsat 8 Collection 2";

    match classify_link(href, text) {
        LinkClassification::Candidate { link_type, priority } => {
            assert_eq!(link_type, LinkType::DatasetDetail);
            assert!(priority >= 15, "priority {priority}");
        }
        LinkClassification::Junk(reason) => panic!("expected candidate, got {reason:?}"),
    }
}

#[test]
fn social_domains_are_junk_whatever_the_text() {
    for href in [
        "https://facebook.com/x",
        "https://www.facebook.com/earthengine",
        "https://m.youtube.com/watch?v=abc",
        "https://www.linkedin.com/company/google",
    ] {
        for text in ["", "Landsat 8 Collection 2", "Sentinel-2 dataset", "NASA SRTM"] {
            assert_eq!(junk_reason(href, text), Some(JunkReason::SocialMedia), "{href} / {text}");
        }
    }
}

#[test]
fn dataset_vocabulary_overrides_tracking_parameters() {
    assert!(!is_junk_link("https://example.com/landsat?utm_source=x", "Landsat scenes"));
    assert!(!is_junk_link("https://example.com/data/landsat?utm_source=x", ""));
    assert!(is_junk_link("https://example.com/offer?utm_source=x", "Great offer"));
}

#[test]
fn classification_is_idempotent() {
    let pairs = [
        ("/datasets/catalog/MODIS_061_MOD13Q1", "MOD13Q1.061 Vegetation Indices"),
        ("https://twitter.com/x", "Share"),
        ("/earth-engine/datasets/tags/sar", "sar"),
        ("javascript:void(0)", ""),
        ("https://en.wikipedia.org/wiki/Sentinel-2", "Sentinel-2"),
    ];
    for (href, text) in pairs {
        let first = classify_link(href, text);
        for _ in 0..3 {
            assert_eq!(classify_link(href, text), first);
        }
        assert_eq!(extraction_priority(href, text), extraction_priority(href, text));
    }
}

#[test]
fn link_types_follow_first_match_order() {
    // satellite vocabulary wins over a dataset path
    assert_eq!(
        link_type_for("/earth-engine/datasets/catalog/satellite_overview", "Satellite overview"),
        LinkType::SatelliteInfo
    );
    assert_eq!(link_type_for("/earth-engine/datasets/tags/landsat", "landsat"), LinkType::TagPage);
    assert_eq!(link_type_for("/products/mod09ga", "MOD09GA"), LinkType::DatasetDetail);
}

#[test]
fn discover_links_on_catalog_page() {
    let html = r##"<html><body>
        <header><a href="/">Home</a><a href="/earth-engine/signup">Sign up</a></header>
        <ul>
          <li><a href="/earth-engine/datasets/catalog/COPERNICUS_S2_SR_HARMONIZED">Harmonized Sentinel-2 MSI</a></li>
          <li><a href="/earth-engine/datasets/catalog/USGS_SRTMGL1_003">NASA SRTM Digital Elevation 30m</a></li>
          <li><a href="/earth-engine/datasets/tags/elevation">elevation</a></li>
          <li><a href="/earth-engine/datasets/catalog/USGS_SRTMGL1_003#bands">Bands</a></li>
        </ul>
        <footer><a href="https://www.facebook.com/googleearth">Facebook</a></footer>
        </body></html>"##;

    let doc = dom::parse(html);
    let base = Url::parse("https://developers.google.com/earth-engine/datasets/catalog").ok();
    let links = discover_links(&doc, base.as_ref());

    assert_eq!(links.len(), 3);
    assert!(links
        .windows(2)
        .all(|w| w[0].extraction_priority >= w[1].extraction_priority));
    assert!(links.iter().all(|l| l.href.starts_with("https://developers.google.com/")));
    assert_eq!(
        links.iter().filter(|l| l.link_type == LinkType::DatasetDetail).count(),
        2
    );
    assert!(links.iter().any(|l| l.link_type == LinkType::TagPage));
}

#[test]
fn malformed_hrefs_never_panic() {
    let doc = dom::parse(
        r#"<a href="http://[">x</a><a href="::">y</a><a href="">z</a><a>no href</a><a href="%%%">Landsat</a>"#,
    );
    let _ = discover_links(&doc, None);
}
