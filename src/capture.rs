//! Capture entry points: one document in, one paginated PDF artifact out.
//!
//! ## Lifecycle
//!
//! Everything a capture touches (the filtered clone, the off-screen
//! surface, the raster, the slices) is created fresh inside one call and
//! gone when it returns. Nothing is shared between invocations, so two
//! sequential captures can never observe each other's state. The surface
//! lives in a lexical scope whose `Drop` runs on success, on error, and
//! when the caller drops the capture future mid-flight.
//!
//! ## Failure policy
//!
//! Fatal errors abort the whole capture; the engine performs no automatic
//! retries and never returns a partial artifact. Per-region link failures
//! are absorbed into the artifact's diagnostics. Asset timeouts are
//! warnings only.

use crate::config::CaptureConfig;
use crate::document::RenderableDocument;
use crate::error::CaptureError;
use crate::output::{CaptureStats, DocumentArtifact};
use crate::pipeline::{assemble, barrier, filter, links, paginate, raster};
use crate::progress::CaptureStage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Capture the document mounted under `handle` into a PDF artifact.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// * [`CaptureError::HostNotConfigured`]: no render host in the config
/// * [`CaptureError::SourceUnavailable`]: the handle resolves to nothing
/// * [`CaptureError::RasterizationFailed`]: degenerate capture bitmap
/// * [`CaptureError::AssemblyFailed`]: PDF construction failed
pub async fn capture(
    handle: &str,
    config: &CaptureConfig,
) -> Result<DocumentArtifact, CaptureError> {
    let host = config
        .host
        .as_ref()
        .ok_or(CaptureError::HostNotConfigured)?;

    let doc = host
        .document(handle)
        .ok_or_else(|| CaptureError::SourceUnavailable {
            handle: handle.to_string(),
        })?;

    capture_document(&doc, config).await
}

/// Capture a document the caller already holds.
///
/// Same pipeline as [`capture`], minus the handle lookup.
pub async fn capture_document(
    doc: &RenderableDocument,
    config: &CaptureConfig,
) -> Result<DocumentArtifact, CaptureError> {
    let host = config
        .host
        .as_ref()
        .ok_or(CaptureError::HostNotConfigured)?;

    let total_start = Instant::now();
    info!(
        width = doc.width,
        height = doc.height,
        images = doc.image_count(),
        "starting capture"
    );
    if let Some(ref obs) = config.observer {
        obs.on_capture_start();
    }

    // ── Stage 1: Build the capture clone ─────────────────────────────────
    notify(config, CaptureStage::Filter);
    let filtered = filter::filter_document(doc);
    let link_sources = filtered.link_sources();
    debug!(links = link_sources.len(), "capture clone ready");

    // ── Stages 2+3: Mount, await readiness, rasterize ────────────────────
    // One surface scope: the mount is torn down by Drop on every path out
    // of this block, including the caller abandoning the future.
    let (raster, report, barrier_ms, raster_ms) = {
        let surface = host.mount(&filtered, raster::surface_width_px(&filtered, config))?;

        notify(config, CaptureStage::AwaitAssets);
        let barrier_start = Instant::now();
        let report = barrier::await_readiness(surface.as_ref(), config).await;
        let barrier_ms = barrier_start.elapsed().as_millis() as u64;

        notify(config, CaptureStage::Rasterize);
        let raster_start = Instant::now();
        let raster = raster::rasterize_surface(surface.as_ref(), config).await?;
        let raster_ms = raster_start.elapsed().as_millis() as u64;

        (raster, report, barrier_ms, raster_ms)
    };

    // ── Stages 4+5: Paginate and remap links ─────────────────────────────
    // Both are pure reads of the finalized raster geometry; the shared
    // ScaleMap keeps their coordinate math identical by construction.
    notify(config, CaptureStage::Paginate);
    let scale = paginate::ScaleMap::new(&raster, config);
    let slices = paginate::slice_pages(&raster, &scale, config.max_pages);
    let (regions, skipped) = links::remap_links(&link_sources, &scale, slices.len());

    if let Some(ref obs) = config.observer {
        for slice in &slices {
            obs.on_page(slice.index, slices.len());
        }
    }

    // ── Stage 6: Assemble the PDF ────────────────────────────────────────
    notify(config, CaptureStage::Assemble);
    let assemble_start = Instant::now();
    let bytes = assemble::assemble_pdf(&raster, &scale, &slices, &regions, config)?;
    let assemble_ms = assemble_start.elapsed().as_millis() as u64;

    let stats = CaptureStats {
        raster_width_px: raster.width(),
        raster_height_px: raster.height(),
        page_count: slices.len(),
        total_links: link_sources.len(),
        emitted_links: regions.len(),
        skipped_links: skipped.len(),
        fonts_timed_out: report.fonts_timed_out,
        timed_out_assets: report.timed_out_assets,
        barrier_duration_ms: barrier_ms,
        raster_duration_ms: raster_ms,
        assemble_duration_ms: assemble_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        pages = stats.page_count,
        links = stats.emitted_links,
        skipped = stats.skipped_links,
        total_ms = stats.total_duration_ms,
        "capture complete"
    );
    if let Some(ref obs) = config.observer {
        obs.on_capture_complete(stats.page_count, stats.emitted_links);
    }

    Ok(DocumentArtifact {
        bytes,
        file_name: assemble::derive_file_name(&config.display_name),
        metadata: assemble::build_metadata(&config.display_name),
        pages: slices,
        links: regions,
        skipped_links: skipped,
        stats,
    })
}

/// Capture and write the artifact into `output_dir` under its derived
/// filename, returning the final path.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn capture_to_file(
    handle: &str,
    output_dir: impl AsRef<Path>,
    config: &CaptureConfig,
) -> Result<PathBuf, CaptureError> {
    let artifact = capture(handle, config).await?;
    let dir = output_dir.as_ref();
    let path = dir.join(&artifact.file_name);

    let write_err = |e: std::io::Error| CaptureError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    };

    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &artifact.bytes)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(write_err)?;

    Ok(path)
}

/// Synchronous wrapper around [`capture`].
///
/// Creates a temporary tokio runtime internally.
pub fn capture_sync(
    handle: &str,
    config: &CaptureConfig,
) -> Result<DocumentArtifact, CaptureError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CaptureError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(capture(handle, config))
}

fn notify(config: &CaptureConfig, stage: CaptureStage) {
    if let Some(ref obs) = config.observer {
        obs.on_stage(stage);
    }
}
