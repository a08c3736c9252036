//! Progress-callback trait for capture pipeline events.
//!
//! Inject an [`Arc<dyn CaptureObserver>`] via
//! [`crate::config::CaptureConfigBuilder::observer`] to receive events as
//! the pipeline moves through its stages.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a Tokio broadcast channel, a UI progress
//! indicator, or a log sink, without the library knowing anything about
//! how the host application communicates. The trait is `Send + Sync` so a
//! single observer can be shared across captures.

use std::sync::Arc;

/// The pipeline stages an observer is notified about, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    /// Cloning the document and stripping excluded/interactive nodes.
    Filter,
    /// Waiting for fonts and embedded images to settle.
    AwaitAssets,
    /// Painting the clone into the capture bitmap.
    Rasterize,
    /// Slicing the bitmap into page bands and projecting links.
    Paginate,
    /// Building the PDF byte stream.
    Assemble,
}

/// Called by the capture pipeline as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait CaptureObserver: Send + Sync {
    /// Called once when the capture starts, before any stage runs.
    fn on_capture_start(&self) {}

    /// Called when a pipeline stage begins.
    fn on_stage(&self, stage: CaptureStage) {
        let _ = stage;
    }

    /// Called once per emitted page slice.
    ///
    /// # Arguments
    /// * `page_num`   - 1-indexed page number
    /// * `page_count` - total pages emitted by the paginator
    fn on_page(&self, page_num: usize, page_count: usize) {
        let _ = (page_num, page_count);
    }

    /// Called once when the artifact is complete.
    ///
    /// # Arguments
    /// * `page_count` - pages in the artifact
    /// * `link_count` - hyperlink regions attached
    fn on_capture_complete(&self, page_count: usize, link_count: usize) {
        let _ = (page_count, link_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopObserver;

impl CaptureObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::CaptureConfig`].
pub type Observer = Arc<dyn CaptureObserver>;
