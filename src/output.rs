//! JSON and CSV persistence.

use std::path::Path;

use crate::error::Result;
use crate::record::DatasetRecord;
use crate::scoring::quality_grade;

/// Separator for list fields in flattened rows.
pub const LIST_SEPARATOR: &str = "; ";

/// Records as pretty-printed JSON. Non-ASCII text is kept as-is.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_json_string(records: &[DatasetRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records to `path` as a pretty JSON array.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json(path: impl AsRef<Path>, records: &[DatasetRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut json = to_json_string(records)?;
    json.push('\n');
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote JSON");
    Ok(())
}

fn join(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// One record as ordered `(column, value)` pairs.
///
/// Lists are joined with `"; "`, the date range becomes two columns and
/// thumbnails are reduced to their image URLs.
#[must_use]
pub fn flatten_record(record: &DatasetRecord) -> Vec<(String, String)> {
    let thumbnails: Vec<String> = record.thumbnails.iter().map(|t| t.src.clone()).collect();

    [
        ("layer_name", record.layer_name.clone()),
        ("date_range_start", record.date_range.start.clone()),
        ("date_range_end", record.date_range.end.clone()),
        ("satellites_used", join(&record.satellites_used)),
        ("location", record.location.clone()),
        ("gee_code_snippet", record.gee_code_snippet.clone()),
        ("thumbnails", join(&thumbnails)),
        ("band_information", join(&record.band_information)),
        ("category_tags", join(&record.category_tags)),
        ("dataset_provider", record.dataset_provider.clone()),
        ("pixel_size", record.pixel_size.clone()),
        ("citations", join(&record.citations)),
        ("description", record.description.clone()),
        ("terms_of_use", record.terms_of_use.clone()),
        ("doi", record.doi.clone()),
        ("extraction_confidence", record.extraction_confidence.as_str().to_string()),
        ("data_completeness", record.data_completeness.to_string()),
        ("extraction_quality", record.extraction_quality.as_str().to_string()),
        ("quality_grade", quality_grade(record).as_str().to_string()),
        ("source_url", record.source_url.clone()),
        ("classification", record.classification.clone()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Write records to `path` as CSV with a header row.
///
/// An empty slice still produces the header.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(path: impl AsRef<Path>, records: &[DatasetRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    let header_source = records.first().cloned().unwrap_or_default();
    let header: Vec<String> = flatten_record(&header_source).into_iter().map(|(k, _)| k).collect();
    writer.write_record(&header)?;

    for record in records {
        writer.write_record(flatten_record(record).into_iter().map(|(_, v)| v))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = records.len(), "wrote CSV");
    Ok(())
}
