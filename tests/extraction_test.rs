use ee_catalog_crawler::{
    analyze_page, assemble_record, extract_record, scoring, Confidence, DatasetRecord, EnricherRegistry, Options,
    PageType, Quality,
};

const LANDSAT_URL: &str = "https://developers.google.com/earth-engine/datasets/catalog/LANDSAT_LC08_C02_T1_L2";

const LANDSAT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head>
  <meta charset="utf-8">
  <title>USGS Landsat 8 Level 2, Collection 2, Tier 1 | Earth Engine Data Catalog</title>
  <link rel="canonical" href="https://developers.google.com/earth-engine/datasets/catalog/LANDSAT_LC08_C02_T1_L2">
  <script type="application/ld+json">
  {
    "@context": "https://schema.org",
    "@type": "Dataset",
    "name": "USGS Landsat 8 Level 2, Collection 2, Tier 1",
    "description": "This dataset contains atmospherically corrected surface reflectance and land surface temperature derived from the data produced by the Landsat 8 OLI/TIRS sensors.",
    "identifier": "https://doi.org/10.5066/P9OGBGM6",
    "keywords": ["landsat", "usgs", "sr"]
  }
  </script>
</head><body>
  <nav><a href="/">Home</a> &gt; <a href="/earth-engine/datasets">Earth Engine Data Catalog</a></nav>
  <article>
    <h1>USGS Landsat 8 Level 2, Collection 2, Tier 1</h1>
    <dl>
      <dt>Dataset Availability</dt><dd>2013-03-18T15:58:14Z - Present</dd>
      <dt>Dataset Provider</dt><dd>USGS</dd>
    </dl>
    <p>Coverage is global, with a 16 day revisit cycle for each scene footprint.</p>
    <img src="/earth-engine/datasets/images/LANDSAT_LC08_C02_T1_L2_sample.png" width="256" height="256" alt="sample">
    <h2>Bands</h2>
    <dl><dt>Pixel Size</dt><dd>30 meters</dd></dl>
    <table>
      <tr><th>Band</th><th>Units</th><th>Description</th></tr>
      <tr><td>SR_B1</td><td></td><td>Band 1 (ultra blue, coastal aerosol) surface reflectance</td></tr>
      <tr><td>SR_B2</td><td></td><td>Band 2 (blue) surface reflectance</td></tr>
    </table>
    <pre>var dataset = ee.ImageCollection('LANDSAT/LC08/C02/T1_L2').filterDate('2021-05-01', '2021-06-01');</pre>
  </article>
</body></html>"#;

#[test]
fn detail_page_fills_every_key_field() {
    let analysis = analyze_page(LANDSAT_PAGE, LANDSAT_URL, None, &Options::default(), &EnricherRegistry::with_defaults());
    assert_eq!(analysis.page_type, PageType::DatasetDetail);

    let record = analysis.record;
    assert_eq!(record.layer_name, "USGS Landsat 8 Level 2, Collection 2, Tier 1");
    assert_eq!(record.date_range.start, "2013-03-18");
    assert_eq!(record.date_range.end, "Present");
    assert_eq!(record.dataset_provider, "USGS");
    assert_eq!(record.pixel_size, "30 meters");
    assert_eq!(record.doi, "10.5066/P9OGBGM6");
    assert_eq!(record.location, "global");
    assert!(record.satellites_used.contains(&"Landsat 8".to_string()));
    assert!(record.gee_code_snippet.contains("ee.ImageCollection('LANDSAT/LC08/C02/T1_L2')"));
    assert_eq!(record.band_information.len(), 2);
    assert!(record.band_information[0].starts_with("SR_B1: "));
    assert!(record.category_tags.iter().any(|t| t == "landsat"));
    assert!(record.description.starts_with("This dataset contains atmospherically corrected"));
    assert!(record
        .thumbnails
        .iter()
        .any(|t| t.src == "https://developers.google.com/earth-engine/datasets/images/LANDSAT_LC08_C02_T1_L2_sample.png"));
    assert_eq!(record.source_url, LANDSAT_URL);

    assert!((record.data_completeness - 100.0).abs() < f64::EPSILON);
    assert_eq!(record.extraction_confidence, Confidence::High);
    assert!(record.extraction_quality >= Quality::Good);
}

fn srtm_page(head: &str) -> String {
    format!(
        r#"<html><head>{head}
  <link rel="canonical" href="https://developers.google.com/earth-engine/datasets/catalog/USGS_SRTMGL1_003">
</head><body>
  <h1>NASA SRTM Digital Elevation 30m</h1>
  <dl>
    <dt>Dataset Availability</dt><dd>2000-02-11T00:00:00Z - 2000-02-22T00:00:00Z</dd>
    <dt>Dataset Provider</dt><dd>NASA / USGS / JPL-Caltech</dd>
  </dl>
  <pre>var dataset = ee.Image('USGS/SRTMGL1_003');</pre>
</body></html>"#
    )
}

#[test]
fn citation_date_does_not_hide_availability_range() {
    let html = srtm_page(r#"<meta name="citation_date" content="2015-01-01">"#);
    let analysis = analyze_page(
        &html,
        "https://developers.google.com/earth-engine/datasets/catalog/USGS_SRTMGL1_003",
        None,
        &Options::default(),
        &EnricherRegistry::with_defaults(),
    );

    assert_eq!(analysis.page_type, PageType::DatasetDetail);
    assert_eq!(analysis.record.date_range.start, "2000-02-11");
    assert_eq!(analysis.record.date_range.end, "2000-02-22");
}

#[test]
fn structured_start_is_completed_from_page_text() {
    let html = srtm_page(r#"<meta name="citation_date" content="1999-06-01">"#);
    let record = extract_record(&html, "https://developers.google.com/earth-engine/datasets/catalog/USGS_SRTMGL1_003");

    assert_eq!(record.date_range.start, "1999-06-01");
    assert_eq!(record.date_range.end, "2000-02-22");
    assert!(record.date_range.is_complete());
}

#[test]
fn availability_with_present_end() {
    let html = "<html><body><h1>Sentinel-2 MSI</h1><p>Dataset Availability 2013-04-11T00:00:00Z - Present</p></body></html>";
    let record = extract_record(html, "https://example.com/s2");

    assert_eq!(record.date_range.start, "2013-04-11");
    assert_eq!(record.date_range.end, "Present");
}

#[test]
fn error_page_is_unknown_and_low_confidence() {
    let analysis = analyze_page(
        "<html><body><h1>404</h1></body></html>",
        "https://developers.google.com/earth-engine/datasets/catalog/MISSING",
        None,
        &Options::default(),
        &EnricherRegistry::with_defaults(),
    );

    assert_eq!(analysis.page_type, PageType::Unknown);
    assert_eq!(analysis.record.extraction_confidence, Confidence::Low);
    assert!(analysis.record.data_completeness < 1.0);
    assert!(analysis.record.layer_name.is_empty());
}

#[test]
fn garbage_input_yields_default_record() {
    let inputs = ["", "<<<>>>", "<html><body></body></html>", "\u{0}\u{FFFD}", "<div><div><div>", "</p></p>"];
    for html in inputs {
        let url = "https://example.com/garbage";
        let record = extract_record(html, url);
        assert_eq!(record, DatasetRecord::new(url), "input {html:?}");

        let json = serde_json::to_value(&record).unwrap();
        let fields = json.as_object().unwrap();
        assert!(fields.values().all(|v| !v.is_null()), "input {html:?}");
    }
}

#[test]
fn completeness_stays_bounded() {
    let pages = [
        LANDSAT_PAGE,
        "<html><body><h1>404</h1></body></html>",
        "<h1>MODIS Terra</h1><p>Pixel Size: 500 meters</p>",
        "",
    ];
    for html in pages {
        let record = extract_record(html, "https://example.com/p");
        assert!((0.0..=100.0).contains(&record.data_completeness));
        assert!((0.0..=100.0).contains(&scoring::data_completeness(&record)));
    }
}

#[test]
fn minimal_mode_keeps_core_fields_only() {
    let options = Options {
        minimal_mode: true,
        ..Options::default()
    };
    let record = assemble_record(LANDSAT_PAGE, LANDSAT_URL, None, &options, &EnricherRegistry::with_defaults());

    assert_eq!(record.layer_name, "USGS Landsat 8 Level 2, Collection 2, Tier 1");
    assert_eq!(record.dataset_provider, "USGS");
    assert_eq!(record.date_range.start, "2013-03-18");
    assert!(record.band_information.is_empty());
    assert!(record.gee_code_snippet.is_empty());
    assert!(record.thumbnails.is_empty());
    assert!(record.classification.is_empty());
}

#[test]
fn thumbnails_can_be_disabled() {
    let options = Options {
        include_thumbnails: false,
        ..Options::default()
    };
    let record = assemble_record(LANDSAT_PAGE, LANDSAT_URL, None, &options, &EnricherRegistry::new());
    assert!(record.thumbnails.is_empty());
    assert!(record.classification.is_empty());
}

#[test]
fn enrichment_assigns_theme() {
    let record = extract_record(LANDSAT_PAGE, LANDSAT_URL);
    assert_eq!(record.classification, "optical");
}
