//! Paginator: slice the tall capture bitmap into output pages.
//!
//! The rasterizer produces one bitmap covering the whole document. Output
//! pages are horizontal bands of it, each one target-page tall, measured in
//! output-page units through a single width-preserving scale factor
//! (`page_width / bitmap_width`). That same [`ScaleMap`] is handed to the
//! link remapper so page math and link math can never drift apart.
//!
//! ## The page ceiling
//!
//! Emission stops at `max_pages`. A document too tall for the ceiling is
//! not truncated: the final allowed slice absorbs the entire remainder, so
//! a six-page résumé capped at five pages yields four clean pages plus one
//! dense overflow page rather than a silently missing tail. The overflow
//! page trades visual quality for completeness.

use crate::config::CaptureConfig;
use crate::host::RasterImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The one scale factor relating the three coordinate spaces of a capture:
/// source-layout pixels, raster (device) pixels, and output-page units.
///
/// Computed once from the rasterizer's output and threaded into both the
/// paginator and the link remapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMap {
    /// Output page width in output-page units.
    pub page_width: f32,
    /// Output page height in output-page units.
    pub page_height: f32,
    /// Output units per raster (device) pixel: `page_width / raster_width`.
    units_per_raster_px: f32,
    /// Output units per source-layout pixel:
    /// `units_per_raster_px * device_scale`.
    units_per_layout_px: f32,
}

impl ScaleMap {
    pub fn new(raster: &RasterImage, config: &CaptureConfig) -> Self {
        let raster_width = (raster.width() as f32).max(1.0);
        let units_per_raster_px = config.page_width / raster_width;
        Self {
            page_width: config.page_width,
            page_height: config.page_height,
            units_per_raster_px,
            units_per_layout_px: units_per_raster_px * raster.device_scale,
        }
    }

    /// Raster pixels → output-page units.
    pub fn raster_to_units(&self, px: f32) -> f32 {
        px * self.units_per_raster_px
    }

    /// Output-page units → raster pixels.
    pub fn units_to_raster(&self, units: f32) -> f32 {
        units / self.units_per_raster_px
    }

    /// Source-layout pixels → output-page units.
    pub fn layout_to_units(&self, px: f32) -> f32 {
        px * self.units_per_layout_px
    }

    /// Full document height in output-page units.
    pub fn document_height(&self, raster: &RasterImage) -> f32 {
        self.raster_to_units(raster.height() as f32)
    }
}

/// One vertical band of the raster, mapped to one output page.
///
/// `offset` and `height` are in output-page units. `height` equals the
/// page height on full pages, is smaller on a trailing partial page, and
/// exceeds it only on the final overflow slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSlice {
    /// 1-based output page index.
    pub index: usize,
    /// Distance from the top of the raster, in output-page units.
    pub offset: f32,
    /// Band height in output-page units.
    pub height: f32,
}

/// Compute the ordered page slices covering `raster` from top to bottom.
///
/// Invariants:
/// * at least one slice, at most `max_pages`;
/// * slices are contiguous and non-overlapping, starting at offset 0;
/// * together they cover the full document height.
pub fn slice_pages(raster: &RasterImage, scale: &ScaleMap, max_pages: usize) -> Vec<PageSlice> {
    let total_height = scale.document_height(raster);
    let page_height = scale.page_height;

    let mut slices = Vec::new();
    let mut offset = 0.0f32;

    while offset < total_height && slices.len() < max_pages {
        let remaining = total_height - offset;
        let is_last_allowed = slices.len() == max_pages - 1;
        let height = if is_last_allowed {
            // Ceiling reached: absorb everything that is left.
            remaining
        } else {
            remaining.min(page_height)
        };

        slices.push(PageSlice {
            index: slices.len() + 1,
            offset,
            height,
        });
        offset += height;
    }

    // A zero-height raster still yields one (degenerate-free) page: the
    // rasterizer rejects empty bitmaps before we get here, but float
    // rounding can leave total_height at 0 for a 1px band.
    if slices.is_empty() {
        slices.push(PageSlice {
            index: 1,
            offset: 0.0,
            height: total_height.max(1.0),
        });
    }

    debug!(
        pages = slices.len(),
        total_height,
        page_height,
        "raster sliced into pages"
    );

    slices
}
