//! Preview images from the main content.

use dom_query::Selection;

use crate::links::Thumbnail;
use crate::page::PageContext;
use crate::record::DatasetRecord;

/// Images narrower or shorter than this are icons.
const MIN_IMAGE_SIDE: u32 = 32;

/// Most thumbnails kept per record.
const MAX_THUMBNAILS: usize = 5;

const ICON_MARKERS: &[&str] = &["icon", "logo", "favicon", "avatar", "sprite", ".svg"];

/// Fill `thumbnails` with content images, absolute URLs, no duplicates.
#[must_use]
pub fn extract_thumbnails(ctx: &PageContext, mut record: DatasetRecord) -> DatasetRecord {
    if !record.thumbnails.is_empty() {
        return record;
    }

    for node in ctx.main_content().select("img").nodes() {
        if record.thumbnails.len() >= MAX_THUMBNAILS {
            break;
        }
        let Some(thumb) = Thumbnail::from_img(&Selection::from(*node), ctx.base.as_ref()) else {
            continue;
        };
        if is_icon(&thumb) || record.thumbnails.iter().any(|t| t.src == thumb.src) {
            continue;
        }
        record.thumbnails.push(thumb);
    }
    record
}

fn is_icon(thumb: &Thumbnail) -> bool {
    let src = thumb.src.to_lowercase();
    if ICON_MARKERS.iter().any(|m| src.contains(m)) {
        return true;
    }
    [&thumb.width, &thumb.height]
        .iter()
        .filter_map(|side| side.trim_end_matches("px").parse::<u32>().ok())
        .any(|side| side < MIN_IMAGE_SIDE)
}
