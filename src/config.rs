//! Configuration types for a document capture.
//!
//! All capture behaviour is controlled through [`CaptureConfig`], built via
//! its [`CaptureConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across captures, log it, and diff two runs to
//! understand why their artifacts differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::CaptureError;
use crate::host::RenderHost;
use crate::progress::CaptureObserver;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A4 portrait in PDF points (210 mm × 297 mm at 72 pt/inch).
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// A4 width in CSS pixels at 96 dpi — the width the capture surface is
/// mounted at so output pages are filled edge to edge.
pub const A4_WIDTH_PX: u32 = 794;

/// Configuration for one document capture.
///
/// Built via [`CaptureConfig::builder()`] or [`CaptureConfig::default()`].
///
/// # Example
/// ```rust
/// use cv2pdf::CaptureConfig;
///
/// let config = CaptureConfig::builder()
///     .max_pages(3)
///     .device_scale(2.0)
///     .display_name("Jane Doe")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CaptureConfig {
    /// Target output page width in output-page units (PDF points).
    /// Default: A4 width (595.28).
    pub page_width: f32,

    /// Target output page height in output-page units (PDF points).
    /// Default: A4 height (841.89).
    pub page_height: f32,

    /// Minimum surface width in source pixels. Default: 794 (A4 at 96 dpi).
    ///
    /// The capture surface is mounted at
    /// `max(document natural width, surface_width_px)`: a résumé narrower
    /// than a page is still rendered page-wide so the artifact has no
    /// letterboxing.
    pub surface_width_px: u32,

    /// Device-scale multiplier for rasterization. Range: 1.0–4.0. Default: 2.0.
    ///
    /// 2.0 doubles the pixel density of the capture without changing the
    /// logical layout — text in the embedded bitmaps stays crisp when the
    /// PDF is zoomed or printed. Higher values grow memory quadratically;
    /// 2.0 is the sweet spot for on-screen documents.
    pub device_scale: f32,

    /// Maximum number of output pages. Default: 5.
    ///
    /// A résumé longer than this is not truncated: the final allowed page
    /// absorbs the entire remainder as one dense overflow page, so content
    /// past the ceiling is never silently lost.
    pub max_pages: usize,

    /// Per-image load timeout. Default: 3 s.
    ///
    /// An image that has neither loaded nor failed when the bound expires
    /// is treated as ready anyway — a broken avatar URL must not stall the
    /// whole capture. Expiry is logged, never raised as an error.
    pub asset_timeout: Duration,

    /// Settle delay before the readiness checks start. Default: 200 ms.
    ///
    /// Gives the host one beat to apply late styling to the freshly
    /// mounted clone before fonts/images are interrogated.
    pub settle_delay: Duration,

    /// Guard timeout on the host's fonts-ready signal. Default: 5 s.
    ///
    /// The fonts future comes from the host and could pend forever on a
    /// misbehaving implementation; this bound keeps the barrier's worst
    /// case at `max(settle_delay, fonts_timeout, asset_timeout)`.
    pub fonts_timeout: Duration,

    /// JPEG quality for the embedded page bands. Range: 1–100. Default: 90.
    pub jpeg_quality: u8,

    /// The user's display name; drives the artifact filename and the PDF
    /// title/author metadata. Default: empty (filename falls back to "CV").
    pub display_name: String,

    /// The rendering host that resolves handles and mounts capture
    /// surfaces. Required for capture; a missing host is
    /// [`CaptureError::HostNotConfigured`].
    pub host: Option<Arc<dyn RenderHost>>,

    /// Optional observer notified at each pipeline stage.
    pub observer: Option<Arc<dyn CaptureObserver>>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            surface_width_px: A4_WIDTH_PX,
            device_scale: 2.0,
            max_pages: 5,
            asset_timeout: Duration::from_secs(3),
            settle_delay: Duration::from_millis(200),
            fonts_timeout: Duration::from_secs(5),
            jpeg_quality: 90,
            display_name: String::new(),
            host: None,
            observer: None,
        }
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("page_width", &self.page_width)
            .field("page_height", &self.page_height)
            .field("surface_width_px", &self.surface_width_px)
            .field("device_scale", &self.device_scale)
            .field("max_pages", &self.max_pages)
            .field("asset_timeout", &self.asset_timeout)
            .field("settle_delay", &self.settle_delay)
            .field("fonts_timeout", &self.fonts_timeout)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("display_name", &self.display_name)
            .field("host", &self.host.as_ref().map(|_| "<dyn RenderHost>"))
            .field("observer", &self.observer.as_ref().map(|_| "<dyn CaptureObserver>"))
            .finish()
    }
}

impl CaptureConfig {
    /// Create a new builder for `CaptureConfig`.
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CaptureConfig`].
#[derive(Debug)]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Set both page dimensions at once, in output-page units.
    pub fn page_size(mut self, width: f32, height: f32) -> Self {
        self.config.page_width = width;
        self.config.page_height = height;
        self
    }

    pub fn surface_width_px(mut self, px: u32) -> Self {
        self.config.surface_width_px = px.max(1);
        self
    }

    pub fn device_scale(mut self, scale: f32) -> Self {
        self.config.device_scale = scale.clamp(1.0, 4.0);
        self
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n.max(1);
        self
    }

    pub fn asset_timeout(mut self, timeout: Duration) -> Self {
        self.config.asset_timeout = timeout;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn fonts_timeout(mut self, timeout: Duration) -> Self {
        self.config.fonts_timeout = timeout;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.config.display_name = name.into();
        self
    }

    pub fn host(mut self, host: Arc<dyn RenderHost>) -> Self {
        self.config.host = Some(host);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CaptureObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CaptureConfig, CaptureError> {
        let c = &self.config;
        if !(c.page_width > 0.0) || !(c.page_height > 0.0) {
            return Err(CaptureError::InvalidConfig(format!(
                "Page size must be positive, got {}x{}",
                c.page_width, c.page_height
            )));
        }
        if c.max_pages == 0 {
            return Err(CaptureError::InvalidConfig("max_pages must be >= 1".into()));
        }
        if !(1.0..=4.0).contains(&c.device_scale) {
            return Err(CaptureError::InvalidConfig(format!(
                "device_scale must be 1.0-4.0, got {}",
                c.device_scale
            )));
        }
        Ok(self.config)
    }
}
