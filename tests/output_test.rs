use ee_catalog_crawler::output::{flatten_record, write_csv, write_json, LIST_SEPARATOR};
use ee_catalog_crawler::scoring::quality_grade;
use ee_catalog_crawler::{extract_record, DatasetRecord, DateRange, Thumbnail};

fn sample_records() -> Vec<DatasetRecord> {
    let first = DatasetRecord {
        layer_name: "Copernicus Global Land Cover Layers: CGLS-LC100 Collection 3".to_string(),
        date_range: DateRange {
            start: "2015-01-01".to_string(),
            end: "2019-12-31".to_string(),
        },
        satellites_used: vec!["PROBA-V".to_string()],
        location: "global".to_string(),
        category_tags: vec!["copernicus".to_string(), "landcover".to_string()],
        thumbnails: vec![Thumbnail {
            src: "https://developers.google.com/earth-engine/datasets/images/COPERNICUS_Landcover_100m.png".to_string(),
            ..Thumbnail::default()
        }],
        description: "Couverture terrestre mondiale à 100 m, « produit dérivé ».".to_string(),
        ..DatasetRecord::new("https://developers.google.com/earth-engine/datasets/catalog/COPERNICUS_Landcover_100m_Proba-V-C3_Global")
    };

    let second = extract_record(
        "<html><body><h1>JRC Global Surface Water Mapping Layers, v1.4</h1>\
         <p>Dataset Availability 1984-03-16T00:00:00Z - 2022-01-01T00:00:00Z</p></body></html>",
        "https://developers.google.com/earth-engine/datasets/catalog/JRC_GSW1_4_GlobalSurfaceWater",
    );

    vec![first, second]
}

#[test]
fn json_round_trips_and_keeps_unicode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let records = sample_records();

    write_json(&path, &records).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("« produit dérivé »"));
    assert!(!raw.contains("null"));

    let parsed: Vec<DatasetRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, records);
    assert_eq!(parsed[1].date_range.start, "1984-03-16");
}

#[test]
fn csv_has_header_and_flattened_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let records = sample_records();
    write_csv(&path, &records).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    let expected: Vec<String> = flatten_record(&records[0]).into_iter().map(|(k, _)| k).collect();
    assert_eq!(headers, expected);
    assert_eq!(&headers[..3], ["layer_name", "date_range_start", "date_range_end"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][column("category_tags")], ["copernicus", "landcover"].join(LIST_SEPARATOR));
    assert_eq!(&rows[0][column("date_range_end")], "2019-12-31");
    assert_eq!(&rows[0][column("description")], records[0].description);
    assert_eq!(&rows[1][column("layer_name")], "JRC Global Surface Water Mapping Layers, v1.4");
    assert_eq!(&rows[1][column("quality_grade")], quality_grade(&records[1]).as_str());
}
