//! Link remapper: project source hyperlinks onto output pages.
//!
//! The raster capture flattens the document to pixels, so clickability has
//! to be rebuilt: every hyperlink's source bounding box is projected into
//! output-page space through the same [`ScaleMap`] the paginator used, then
//! anchored to the page its top edge lands on.
//!
//! Remapping is a pure function of document geometry and config — running
//! it twice over identical inputs yields identical regions, and it may run
//! before, after, or interleaved with pagination since both stages only
//! read the finalized raster geometry.
//!
//! Invalid regions (dead URLs, zero-area boxes, positions past the emitted
//! page range) are dropped one by one with a [`RegionSkip`] diagnostic;
//! a bad link never aborts the capture.
//!
//! Known limitation: a region straddling a page boundary is attached to
//! the page containing its top edge only; the clickable area that spills
//! onto the next page is lost. The loss is bounded by one region height.

use crate::document::LinkSource;
use crate::error::RegionSkip;
use crate::pipeline::paginate::ScaleMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A clickable rectangle resolved to one output page.
///
/// Coordinates are output-page units, top-left origin within the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRegion {
    /// 1-based output page index.
    pub page: usize,
    pub x: f32,
    /// Distance from the top of `page`.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub url: String,
}

/// Project every source link onto the emitted pages.
///
/// Returns the surviving regions plus one [`RegionSkip`] per dropped one.
pub fn remap_links(
    sources: &[LinkSource],
    scale: &ScaleMap,
    page_count: usize,
) -> (Vec<LinkRegion>, Vec<RegionSkip>) {
    let mut regions = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();

    for source in sources {
        match project(source, scale, page_count) {
            Ok(region) => regions.push(region),
            Err(skip) => {
                warn!(%skip, "link region dropped");
                skipped.push(skip);
            }
        }
    }

    (regions, skipped)
}

fn project(
    source: &LinkSource,
    scale: &ScaleMap,
    page_count: usize,
) -> Result<LinkRegion, RegionSkip> {
    if !is_navigable(&source.href) {
        return Err(RegionSkip::NonNavigableUrl {
            url: source.href.clone(),
        });
    }

    if source.bounds.width <= 0.0 || source.bounds.height <= 0.0 {
        return Err(RegionSkip::DegenerateBounds {
            url: source.href.clone(),
            width: source.bounds.width,
            height: source.bounds.height,
        });
    }

    // Source-layout px -> output units; boxes poking past the document's
    // left/top edge are clamped to the page.
    let x = scale.layout_to_units(source.bounds.x).max(0.0);
    let y = scale.layout_to_units(source.bounds.y).max(0.0);
    let width = scale.layout_to_units(source.bounds.width);
    let height = scale.layout_to_units(source.bounds.height);

    let page = ((y / scale.page_height).floor() as usize + 1).max(1);
    if page > page_count {
        return Err(RegionSkip::PageOutOfRange {
            url: source.href.clone(),
            page,
            page_count,
        });
    }

    let y_on_page = y - (page - 1) as f32 * scale.page_height;

    Ok(LinkRegion {
        page,
        x,
        y: y_on_page,
        width,
        height,
        url: source.href.clone(),
    })
}

/// A URL the artifact should make clickable: non-empty, not a bare
/// fragment, not a script scheme.
fn is_navigable(href: &str) -> bool {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed == "#" {
        return false;
    }
    let lower = trimmed.to_ascii_lowercase();
    !lower.starts_with("javascript:")
}
