//! Bands and pixel size.

use dom_query::Selection;

use crate::dom;
use crate::page::PageContext;
use crate::patterns::{BAND_HEADER, BAND_LIST, LABELLED_PIXEL_SIZE, PIXEL_SIZE};
use crate::record::DatasetRecord;

const PIXEL_SIZE_LABELS: &[&str] = &["Pixel Size", "Spatial Resolution", "Resolution"];

/// Longest single entry of a free-text band list.
const MAX_BAND_TOKEN_LEN: usize = 40;

/// Longest labelled pixel-size value taken verbatim.
const MAX_PIXEL_SIZE_LEN: usize = 40;

/// Fill `band_information` and `pixel_size`.
#[must_use]
pub fn extract_technical(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if record.band_information.is_empty() {
        let bands = bands_from_tables(ctx);
        record.band_information = if bands.is_empty() {
            bands_from_text(ctx)
        } else {
            bands
        };
    }

    if record.pixel_size.is_empty() {
        if let Some(size) = pixel_size(ctx) {
            tracing::debug!(%size, "pixel size");
            record.pixel_size = size;
        }
    }

    record
}

/// Direct `th`/`td` children of a row, nested tables excluded.
fn cell_nodes<'a>(row: &Selection<'a>) -> Vec<(Selection<'a>, bool)> {
    row.children()
        .nodes()
        .iter()
        .filter_map(|node| {
            let cell = Selection::from(*node);
            match dom::tag_name(&cell).as_deref() {
                Some("th") => Some((cell, true)),
                Some("td") => Some((cell, false)),
                _ => None,
            }
        })
        .collect()
}

/// Visible text of each direct `th`/`td` cell of a row.
fn row_cells(row: &Selection) -> Vec<String> {
    cell_nodes(row).iter().map(|(cell, _)| dom::visible_text(cell)).collect()
}

/// A row made of header cells only.
fn is_header_row(row: &Selection) -> bool {
    let cells = cell_nodes(row);
    !cells.is_empty() && cells.iter().all(|(_, is_header)| *is_header)
}

/// Rows of the first band table.
///
/// A table qualifies when its header row, or the first cell of any row,
/// mentions bands, channels or wavelengths.
fn bands_from_tables(ctx: &PageContext) -> Vec<String> {
    for table in ctx.doc.select("table").nodes() {
        let table = Selection::from(*table);
        let rows: Vec<Selection> = table.select("tr").nodes().iter().map(|r| Selection::from(*r)).collect();

        let header_mentions = rows
            .iter()
            .find(|r| is_header_row(r))
            .is_some_and(|r| BAND_HEADER.is_match(&dom::visible_text(r)));
        let first_cell_mentions = rows.iter().any(|r| {
            !is_header_row(r) && row_cells(r).first().is_some_and(|c| BAND_HEADER.is_match(c))
        });
        if !header_mentions && !first_cell_mentions {
            continue;
        }

        let bands: Vec<String> = rows
            .iter()
            .filter(|r| !is_header_row(r))
            .filter_map(|r| {
                let cells = row_cells(r);
                if cells.len() < 2 || cells[0].is_empty() {
                    return None;
                }
                let detail = cells[cells.len() - 1].as_str();
                Some(if detail.is_empty() {
                    cells[0].clone()
                } else {
                    format!("{}: {detail}", cells[0])
                })
            })
            .collect();

        if !bands.is_empty() {
            tracing::debug!(count = bands.len(), "bands from table");
            return bands;
        }
    }

    Vec::new()
}

/// `Bands: B1, B2, B3` in a paragraph or list item, then in the page text.
fn bands_from_text(ctx: &PageContext) -> Vec<String> {
    let blocks = ctx
        .doc
        .select("p, li, dd, td")
        .nodes()
        .iter()
        .map(|n| dom::visible_text(&Selection::from(*n)))
        .collect::<Vec<_>>();

    blocks
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(ctx.text.as_str()))
        .find_map(|text| {
            let list = BAND_LIST.captures(text)?.get(1)?.as_str();
            let bands: Vec<String> = list
                .split(',')
                .map(|b| b.trim().trim_start_matches("and ").trim())
                .filter(|b| !b.is_empty() && b.len() <= MAX_BAND_TOKEN_LEN)
                .map(String::from)
                .collect();
            (!bands.is_empty()).then_some(bands)
        })
        .unwrap_or_default()
}

fn pixel_size(ctx: &PageContext) -> Option<String> {
    if let Some(value) = dom::labeled_value(&ctx.doc, PIXEL_SIZE_LABELS) {
        if let Some(m) = PIXEL_SIZE.find(&value) {
            return Some(m.as_str().to_string());
        }
        if value.len() <= MAX_PIXEL_SIZE_LEN && value.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(value);
        }
    }

    LABELLED_PIXEL_SIZE
        .captures(&ctx.text)
        .and_then(|caps| caps.get(1))
        .or_else(|| PIXEL_SIZE.find(&ctx.text))
        .map(|m| m.as_str().to_string())
}
