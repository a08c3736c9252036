//! The seam between the engine and whatever actually paints pixels.
//!
//! The engine does not render documents itself; the embedding application
//! does (a webview, a native canvas, a headless layout engine). It plugs in
//! through two traits:
//!
//! * [`RenderHost`] resolves a document handle and mounts a capture clone
//!   on an **off-screen, non-visible** surface.
//! * [`RenderSurface`] is one mounted clone. It exposes the asset-readiness
//!   futures the barrier waits on, and the rasterize pass itself.
//!
//! ## Teardown contract
//!
//! A surface is exclusively owned by its in-flight capture. Implementations
//! must release the underlying resources (detach the off-screen container,
//! free GPU/bitmap memory) in `Drop`. The engine holds the surface in a
//! lexical scope, so teardown runs on every exit path: success, error, or
//! the caller abandoning the capture future mid-flight.
//!
//! ## Boundedness contract
//!
//! `rasterize` must resolve in bounded time; the engine's only other
//! suspension points (font/image readiness) are timeout-guarded on the
//! engine side.

use crate::document::RenderableDocument;
use crate::error::CaptureError;
use futures::future::BoxFuture;
use image::DynamicImage;

/// A rendering host that can look up mounted documents and produce
/// off-screen capture surfaces for their clones.
pub trait RenderHost: Send + Sync {
    /// Resolve a document handle to its layout tree.
    ///
    /// Returns `None` when no document is mounted under `handle` (the
    /// source has been torn down or never existed); the engine maps this
    /// to [`CaptureError::SourceUnavailable`].
    fn document(&self, handle: &str) -> Option<RenderableDocument>;

    /// Mount a filtered capture clone on a fresh off-screen surface,
    /// `surface_width_px` source pixels wide.
    ///
    /// The surface must not be visible to the user and must not disturb
    /// the on-screen original.
    fn mount(
        &self,
        doc: &RenderableDocument,
        surface_width_px: u32,
    ) -> Result<Box<dyn RenderSurface>, CaptureError>;
}

/// One mounted capture clone. See the module docs for the teardown and
/// boundedness contracts.
pub trait RenderSurface: Send {
    /// Resolves once every font face the mounted clone needs is loaded.
    ///
    /// May never resolve on a misbehaving host; the engine wraps it in a
    /// guard timeout.
    fn fonts_ready(&self) -> BoxFuture<'static, ()>;

    /// One future per embedded image, each resolving when that image has
    /// finished loading, successfully or not. A failed load still
    /// resolves: a broken image must not stall the capture.
    fn image_loads(&self) -> Vec<BoxFuture<'static, ()>>;

    /// Paint the mounted clone into a bitmap at `device_scale` × the
    /// surface's logical pixel size.
    fn rasterize(&self, device_scale: f32) -> BoxFuture<'_, Result<RasterImage, CaptureError>>;
}

/// A fixed-resolution pixel buffer of the fully rendered document, plus the
/// device-scale multiplier it was produced at.
///
/// Produced once per capture. The paginator slices it; the link remapper
/// only needs the ratio between the source layout width and the pixel
/// width, which [`crate::pipeline::paginate::ScaleMap`] derives from here.
pub struct RasterImage {
    pub image: DynamicImage,
    pub device_scale: f32,
}

impl RasterImage {
    pub fn new(image: DynamicImage, device_scale: f32) -> Self {
        Self {
            image,
            device_scale,
        }
    }

    /// Bitmap width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Bitmap height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Logical layout width the clone was mounted at, in source pixels.
    pub fn layout_width(&self) -> f32 {
        self.width() as f32 / self.device_scale
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("device_scale", &self.device_scale)
            .finish()
    }
}
