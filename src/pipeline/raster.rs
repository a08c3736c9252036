//! Rasterizer: paint the ready clone into one tall bitmap.
//!
//! The capture surface renders at the width the clone was mounted at,
//! never narrower than the configured page pixel width, and at the full
//! natural height of the laid-out document, multiplied by the device-scale
//! factor. Scale raises pixel density only; the logical layout is
//! untouched, which is what lets the link remapper stay in layout
//! coordinates.
//!
//! The surface itself is owned by the caller for the duration of the
//! capture and torn down by `Drop` on every exit path; this module only
//! runs the paint pass and validates its result.

use crate::config::CaptureConfig;
use crate::document::RenderableDocument;
use crate::error::CaptureError;
use crate::host::{RasterImage, RenderSurface};
use tracing::{debug, info};

/// Width the capture surface is mounted at: never narrower than the
/// configured page pixel width, so a narrow document still fills an output
/// page edge to edge.
pub fn surface_width_px(doc: &RenderableDocument, config: &CaptureConfig) -> u32 {
    (doc.width.ceil() as u32).max(config.surface_width_px)
}

/// Run the paint pass on a mounted, ready surface.
///
/// A zero-width or zero-height bitmap is a fatal
/// [`CaptureError::RasterizationFailed`]; the engine does not retry (the
/// caller may re-trigger the whole capture).
pub async fn rasterize_surface(
    surface: &dyn RenderSurface,
    config: &CaptureConfig,
) -> Result<RasterImage, CaptureError> {
    let raster = surface.rasterize(config.device_scale).await?;

    if raster.width() == 0 || raster.height() == 0 {
        return Err(CaptureError::RasterizationFailed {
            detail: format!(
                "capture surface produced a degenerate {}x{} bitmap",
                raster.width(),
                raster.height()
            ),
        });
    }

    info!(
        width = raster.width(),
        height = raster.height(),
        device_scale = raster.device_scale,
        "document rasterized"
    );
    debug!(layout_width = raster.layout_width(), "raster layout geometry");

    Ok(raster)
}
