//! Error types for the cv2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`CaptureError`] — **Fatal**: the capture cannot produce an artifact
//!   at all (unresolvable document handle, degenerate bitmap, PDF
//!   construction failure). Returned as `Err(CaptureError)` from the
//!   top-level `capture*` functions. The engine never retries; retry
//!   policy belongs to the caller.
//!
//! * [`RegionSkip`] — **Non-fatal**: a single hyperlink region failed a
//!   validity check and was dropped. Collected into
//!   [`crate::output::DocumentArtifact::skipped_links`] and logged as a
//!   warning; the rest of the pipeline continues untouched.
//!
//! Asset timeouts are deliberately in *neither* enum: an image or font
//! that never settles is treated as ready once its bound expires, surfaced
//! only through `warn!` logs and [`crate::output::CaptureStats`] counters.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the cv2pdf library.
#[derive(Debug, Error)]
pub enum CaptureError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// No render host was supplied in the configuration.
    #[error("No render host configured.\nSupply one with CaptureConfig::builder().host(...).")]
    HostNotConfigured,

    /// The document handle could not be resolved to a mounted document.
    #[error("Document '{handle}' is not mounted in the display context.\nIt may have been torn down before capture started.")]
    SourceUnavailable { handle: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The capture pass produced an empty or degenerate bitmap.
    #[error("Rasterization failed: {detail}")]
    RasterizationFailed { detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// The final PDF could not be constructed.
    #[error("Artifact assembly failed: {detail}")]
    AssemblyFailed { detail: String },

    /// Could not write the finished artifact to disk.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal, per-region reason a hyperlink was left out of the artifact.
///
/// Never propagated as an `Err`; stored alongside the emitted regions so
/// callers can inspect why a link is missing from the output.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum RegionSkip {
    /// The URL is empty, `"#"`, or a non-navigable scheme.
    #[error("link '{url}' skipped: not a navigable URL")]
    NonNavigableUrl { url: String },

    /// The region's projected box has no area.
    #[error("link '{url}' skipped: degenerate bounds {width}x{height}")]
    DegenerateBounds { url: String, width: f32, height: f32 },

    /// The region lands past the last emitted page.
    #[error("link '{url}' skipped: page {page} beyond the {page_count} emitted page(s)")]
    PageOutOfRange {
        url: String,
        page: usize,
        page_count: usize,
    },
}
