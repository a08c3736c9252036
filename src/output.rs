//! Output types: the finished artifact and its capture report.
//!
//! A capture produces exactly one [`DocumentArtifact`]: the PDF bytes plus
//! everything a host application needs to present or archive the result:
//! the suggested filename, the metadata written into the document, the page
//! layout that was emitted, which hyperlinks survived projection (and why
//! the others did not), and per-stage timing.
//!
//! All of this is terminal and immutable: the engine hands the artifact to
//! the caller (a share/save flow) and keeps nothing.

use crate::error::RegionSkip;
use crate::pipeline::links::LinkRegion;
use crate::pipeline::paginate::PageSlice;
use serde::{Deserialize, Serialize};

/// Metadata written into the PDF Information dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
}

/// Statistics for one capture run.
///
/// `fonts_timed_out` / `timed_out_assets` record readiness-barrier bounds
/// that expired; they are informational, since an expired bound never
/// fails the capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Bitmap dimensions in device pixels.
    pub raster_width_px: u32,
    pub raster_height_px: u32,

    /// Pages emitted (always `1..=max_pages`).
    pub page_count: usize,

    /// Hyperlink regions found in the filtered document.
    pub total_links: usize,
    /// Regions attached to output pages.
    pub emitted_links: usize,
    /// Regions dropped by validity checks.
    pub skipped_links: usize,

    /// Whether the fonts-ready guard timeout expired.
    pub fonts_timed_out: bool,
    /// Embedded images whose load wait expired.
    pub timed_out_assets: usize,

    /// Wall-clock durations per stage.
    pub barrier_duration_ms: u64,
    pub raster_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The paginated, link-annotated capture of one document.
#[derive(Debug)]
pub struct DocumentArtifact {
    /// The finished PDF byte stream.
    pub bytes: Vec<u8>,

    /// Suggested filename, derived from the user's display name.
    pub file_name: String,

    /// Metadata as written into the document.
    pub metadata: ArtifactMetadata,

    /// The vertical band of the raster each output page shows.
    pub pages: Vec<PageSlice>,

    /// Hyperlink regions attached to output pages.
    pub links: Vec<LinkRegion>,

    /// Regions dropped during projection, with reasons.
    pub skipped_links: Vec<RegionSkip>,

    /// Timing and readiness diagnostics.
    pub stats: CaptureStats,
}

impl DocumentArtifact {
    /// Number of output pages in the artifact.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
