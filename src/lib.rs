//! # cv2pdf
//!
//! Capture a fully laid-out résumé document into a paginated,
//! hyperlink-preserving PDF suitable for automated applicant-tracking
//! ingestion.
//!
//! ## Why this crate?
//!
//! A résumé built in a live editor is a layout tree, not a document file.
//! Exporting it by re-flowing text into PDF primitives loses the exact
//! visual layout the user approved, and font/diacritic coverage with it.
//! Instead this crate captures the document the way the user sees it:
//! rasterize the laid-out tree once, slice the bitmap into A4 pages, and
//! re-project every hyperlink onto the page it lands on so the artifact
//! stays clickable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document handle
//!  │
//!  ├─ 1. Filter    clone the tree, drop excluded regions & controls
//!  ├─ 2. Barrier   bounded waits for fonts + embedded images
//!  ├─ 3. Raster    paint the clone off-screen into one tall bitmap
//!  ├─ 4. Paginate  slice into page bands (max-page ceiling, overflow fold)
//!  ├─ 5. Links     project hyperlink boxes onto their output pages
//!  └─ 6. Assemble  embed bands + annotations + metadata → PDF bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cv2pdf::{capture, CaptureConfig};
//! use std::sync::Arc;
//! # fn make_host() -> Arc<dyn cv2pdf::RenderHost> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = make_host(); // the app's off-screen rendering backend
//!     let config = CaptureConfig::builder()
//!         .display_name("Jane Doe")
//!         .host(host)
//!         .build()?;
//!     let artifact = capture("cv-preview", &config).await?;
//!     std::fs::write(&artifact.file_name, &artifact.bytes)?;
//!     eprintln!("{} pages, {} links", artifact.page_count(), artifact.links.len());
//!     Ok(())
//! }
//! ```
//!
//! ## What this is not
//!
//! The output is a raster capture: pages embed bitmaps, not reflowable
//! text. Exact color management, page formats beyond the configured one,
//! and sub-pixel link alignment are out of scope.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capture;
pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capture::{capture, capture_document, capture_sync, capture_to_file};
pub use config::{CaptureConfig, CaptureConfigBuilder, A4_HEIGHT_PT, A4_WIDTH_PT, A4_WIDTH_PX};
pub use document::{DocNode, LinkSource, NodeKind, Rect, RenderableDocument};
pub use error::{CaptureError, RegionSkip};
pub use host::{RasterImage, RenderHost, RenderSurface};
pub use output::{ArtifactMetadata, CaptureStats, DocumentArtifact};
pub use pipeline::links::LinkRegion;
pub use pipeline::paginate::{PageSlice, ScaleMap};
pub use progress::{CaptureObserver, CaptureStage, NoopObserver};
