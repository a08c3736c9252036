//! End-to-end tests for cv2pdf.
//!
//! These drive the full capture pipeline through a scripted in-memory
//! render host with no display context and no GUI. The mock paints
//! nothing real; it produces blank bitmaps of the geometry a real surface
//! would, which is all the paginator, remapper, and assembler ever look
//! at.

use cv2pdf::{
    capture, capture_to_file, CaptureConfig, CaptureError, CaptureObserver, CaptureStage, DocNode,
    NodeKind, RasterImage, Rect, RegionSkip, RenderableDocument, RenderHost, RenderSurface,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Mock host ────────────────────────────────────────────────────────────

/// How the scripted surface should (mis)behave.
#[derive(Clone, Default)]
struct SurfaceScript {
    /// Images that never fire their load event (exercises the barrier bound).
    stuck_images: usize,
    /// Produce a zero-height bitmap regardless of the document.
    degenerate_raster: bool,
}

struct MockHost {
    documents: HashMap<String, RenderableDocument>,
    script: SurfaceScript,
    /// Flipped by the surface's Drop; proves teardown ran.
    torn_down: Arc<AtomicBool>,
}

impl MockHost {
    fn new(documents: Vec<(&str, RenderableDocument)>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            script: SurfaceScript::default(),
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    fn with_script(mut self, script: SurfaceScript) -> Self {
        self.script = script;
        self
    }
}

impl RenderHost for MockHost {
    fn document(&self, handle: &str) -> Option<RenderableDocument> {
        self.documents.get(handle).cloned()
    }

    fn mount(
        &self,
        doc: &RenderableDocument,
        surface_width_px: u32,
    ) -> Result<Box<dyn RenderSurface>, CaptureError> {
        Ok(Box::new(MockSurface {
            width_px: surface_width_px,
            doc_height_px: doc.height,
            image_count: doc.image_count(),
            script: self.script.clone(),
            torn_down: Arc::clone(&self.torn_down),
        }))
    }
}

struct MockSurface {
    width_px: u32,
    doc_height_px: f32,
    image_count: usize,
    script: SurfaceScript,
    torn_down: Arc<AtomicBool>,
}

impl RenderSurface for MockSurface {
    fn fonts_ready(&self) -> BoxFuture<'static, ()> {
        futures::future::ready(()).boxed()
    }

    fn image_loads(&self) -> Vec<BoxFuture<'static, ()>> {
        (0..self.image_count)
            .map(|i| {
                if i < self.script.stuck_images {
                    futures::future::pending().boxed()
                } else {
                    futures::future::ready(()).boxed()
                }
            })
            .collect()
    }

    fn rasterize(&self, device_scale: f32) -> BoxFuture<'_, Result<RasterImage, CaptureError>> {
        let (w, h) = if self.script.degenerate_raster {
            (self.width_px, 0)
        } else {
            (
                (self.width_px as f32 * device_scale) as u32,
                (self.doc_height_px * device_scale) as u32,
            )
        };
        let img = DynamicImage::new_rgb8(w, h);
        futures::future::ready(Ok(RasterImage::new(img, device_scale))).boxed()
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

// ── Test fixtures ────────────────────────────────────────────────────────

fn link(href: &str, x: f32, y: f32, w: f32, h: f32) -> DocNode {
    DocNode::new(NodeKind::Link { href: href.into() }, Rect::new(x, y, w, h))
}

fn text(s: &str, y: f32) -> DocNode {
    DocNode::new(NodeKind::Text(s.into()), Rect::new(0.0, y, 400.0, 20.0))
}

/// A 500px-wide résumé document `height` px tall, with the given extra
/// nodes under a root group.
fn doc(height: f32, children: Vec<DocNode>) -> RenderableDocument {
    let root =
        DocNode::new(NodeKind::Group, Rect::new(0.0, 0.0, 500.0, height)).with_children(children);
    RenderableDocument::new(root, 500.0, height)
}

/// Config in a legible unit space: 500-unit-wide, 1000-unit-tall pages
/// over a 500px surface at device scale 1, so 1 source px == 1 unit.
fn unit_config(host: Arc<dyn RenderHost>) -> CaptureConfig {
    CaptureConfig::builder()
        .page_size(500.0, 1000.0)
        .surface_width_px(500)
        .device_scale(1.0)
        .settle_delay(Duration::from_millis(1))
        .asset_timeout(Duration::from_millis(50))
        .fonts_timeout(Duration::from_millis(100))
        .host(host)
        .build()
        .expect("valid config")
}

fn assert_is_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-"), "artifact is not a PDF");
    let parsed = lopdf::Document::load_mem(bytes).expect("artifact should parse");
    assert!(!parsed.get_pages().is_empty());
}

// ── Happy path ───────────────────────────────────────────────────────────

#[tokio::test]
async fn two_page_cv_with_links_round_trips() {
    let host = Arc::new(MockHost::new(vec![(
        "cv-preview",
        doc(
            1500.0,
            vec![
                text("Jane Doe", 20.0),
                link("https://github.com/janedoe", 40.0, 200.0, 180.0, 18.0),
                link("mailto:jane@example.com", 40.0, 1200.0, 180.0, 18.0),
            ],
        ),
    )]));
    let config = unit_config(host);

    let artifact = capture("cv-preview", &config).await.expect("capture");

    assert_eq!(artifact.page_count(), 2);
    assert_eq!(artifact.pages[0].height, 1000.0);
    assert_eq!(artifact.pages[1].height, 500.0);

    assert_eq!(artifact.links.len(), 2);
    assert_eq!(artifact.links[0].page, 1);
    assert_eq!(artifact.links[0].y, 200.0);
    assert_eq!(artifact.links[1].page, 2);
    assert_eq!(artifact.links[1].y, 200.0);
    assert!(artifact.skipped_links.is_empty());

    assert_eq!(artifact.stats.page_count, 2);
    assert_eq!(artifact.stats.emitted_links, 2);
    assert_eq!(artifact.stats.raster_width_px, 500);
    assert_eq!(artifact.stats.raster_height_px, 1500);

    assert_is_pdf(&artifact.bytes);
    let parsed = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert_eq!(parsed.get_pages().len(), 2);
}

#[tokio::test]
async fn page_ceiling_folds_overflow_instead_of_dropping_it() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(3000.0, vec![]))]));
    let mut config = unit_config(host);
    config.max_pages = 2;

    let artifact = capture("cv", &config).await.expect("capture");

    assert_eq!(artifact.page_count(), 2);
    assert_eq!(artifact.pages[0].height, 1000.0);
    // The second (final allowed) page absorbs the remaining 2000 units.
    assert_eq!(artifact.pages[1].offset, 1000.0);
    assert_eq!(artifact.pages[1].height, 2000.0);
    assert_is_pdf(&artifact.bytes);
}

#[tokio::test]
async fn device_scale_changes_density_not_geometry() {
    let build = |scale: f32| {
        let host = Arc::new(MockHost::new(vec![(
            "cv",
            doc(
                1500.0,
                vec![link("https://example.com", 40.0, 1200.0, 100.0, 20.0)],
            ),
        )]));
        let mut config = unit_config(host);
        config.device_scale = scale;
        config
    };

    let at_1x = capture("cv", &build(1.0)).await.unwrap();
    let at_2x = capture("cv", &build(2.0)).await.unwrap();

    assert_eq!(at_2x.stats.raster_width_px, 1000);
    assert_eq!(at_2x.stats.raster_height_px, 3000);
    // Same pages, same link placement, despite twice the pixels.
    assert_eq!(at_1x.pages, at_2x.pages);
    assert_eq!(at_1x.links, at_2x.links);
}

// ── Exclusion & link filtering ───────────────────────────────────────────

#[tokio::test]
async fn excluded_regions_and_controls_never_reach_the_artifact() {
    let host = Arc::new(MockHost::new(vec![(
        "cv",
        doc(
            800.0,
            vec![
                link("https://keep.example", 10.0, 100.0, 100.0, 20.0),
                link("https://hidden.example", 10.0, 300.0, 100.0, 20.0).excluded(),
                DocNode::new(NodeKind::Control, Rect::new(10.0, 500.0, 80.0, 30.0)),
            ],
        ),
    )]));
    let config = unit_config(host);

    let artifact = capture("cv", &config).await.unwrap();

    assert_eq!(artifact.stats.total_links, 1);
    assert_eq!(artifact.links.len(), 1);
    assert_eq!(artifact.links[0].url, "https://keep.example");
}

#[tokio::test]
async fn invalid_links_are_skipped_with_reasons_not_errors() {
    let host = Arc::new(MockHost::new(vec![(
        "cv",
        doc(
            2500.0,
            vec![
                link("#", 10.0, 50.0, 100.0, 20.0),
                link("", 10.0, 80.0, 100.0, 20.0),
                link("javascript:void(0)", 10.0, 110.0, 100.0, 20.0),
                link("https://tail.example", 10.0, 2200.0, 100.0, 20.0),
                link("https://ok.example", 10.0, 140.0, 100.0, 20.0),
            ],
        ),
    )]));
    let mut config = unit_config(host);
    config.max_pages = 2;

    let artifact = capture("cv", &config).await.unwrap();

    assert_eq!(artifact.links.len(), 1);
    assert_eq!(artifact.links[0].url, "https://ok.example");
    assert_eq!(artifact.skipped_links.len(), 4);
    assert!(artifact
        .skipped_links
        .iter()
        .any(|s| matches!(s, RegionSkip::PageOutOfRange { page: 3, .. })));
    assert_eq!(artifact.stats.skipped_links, 4);
}

// ── Readiness barrier ────────────────────────────────────────────────────

#[tokio::test]
async fn stuck_image_delays_but_never_blocks_the_capture() {
    let host = Arc::new(
        MockHost::new(vec![(
            "cv",
            doc(
                800.0,
                vec![DocNode::new(
                    NodeKind::Image {
                        src: "dead-avatar.png".into(),
                    },
                    Rect::new(10.0, 10.0, 96.0, 96.0),
                )],
            ),
        )])
        .with_script(SurfaceScript {
            stuck_images: 1,
            ..Default::default()
        }),
    );
    let config = unit_config(host);

    let start = std::time::Instant::now();
    let artifact = capture("cv", &config).await.expect("capture proceeds");
    let elapsed = start.elapsed();

    assert_eq!(artifact.stats.timed_out_assets, 1);
    assert!(!artifact.stats.fonts_timed_out);
    // Bounded by settle + asset timeout, with scheduling slack.
    assert!(
        elapsed < Duration::from_secs(2),
        "barrier failed to bound the stuck image: {elapsed:?}"
    );
    assert_is_pdf(&artifact.bytes);
}

// ── Failure paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_handle_is_source_unavailable() {
    let host = Arc::new(MockHost::new(vec![]));
    let config = unit_config(host);

    let err = capture("nope", &config).await.unwrap_err();
    assert!(matches!(err, CaptureError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("nope"));
}

#[tokio::test]
async fn missing_host_is_a_typed_error() {
    let config = CaptureConfig::builder().build().unwrap();
    let err = capture("cv", &config).await.unwrap_err();
    assert!(matches!(err, CaptureError::HostNotConfigured));
}

#[tokio::test]
async fn degenerate_bitmap_fails_and_still_tears_down_the_surface() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(800.0, vec![]))]).with_script(
        SurfaceScript {
            degenerate_raster: true,
            ..Default::default()
        },
    ));
    let torn_down = Arc::clone(&host.torn_down);
    let config = unit_config(host);

    let err = capture("cv", &config).await.unwrap_err();
    assert!(matches!(err, CaptureError::RasterizationFailed { .. }));
    assert!(
        torn_down.load(Ordering::SeqCst),
        "surface must be released on the error path"
    );
}

#[tokio::test]
async fn surface_is_torn_down_on_success_too() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(800.0, vec![]))]));
    let torn_down = Arc::clone(&host.torn_down);
    let config = unit_config(host);

    let _ = capture("cv", &config).await.unwrap();
    assert!(torn_down.load(Ordering::SeqCst));
}

// ── Filename, metadata, file output ──────────────────────────────────────

#[tokio::test]
async fn filename_and_metadata_derive_from_the_display_name() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(800.0, vec![]))]));
    let mut config = unit_config(host);
    config.display_name = "Ayşe Ö. Yılmaz!!".to_string();

    let artifact = capture("cv", &config).await.unwrap();

    assert_eq!(artifact.file_name, "Aye__Ylmaz_ATS_CV.pdf");
    assert_eq!(artifact.metadata.title, "Aye__Ylmaz - CV");
    assert_eq!(artifact.metadata.author, "Aye__Ylmaz");
    assert_eq!(artifact.metadata.subject, "CV - Resume");
}

#[tokio::test]
async fn capture_to_file_writes_the_artifact_atomically() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(800.0, vec![]))]));
    let mut config = unit_config(host);
    config.display_name = "Jane Doe".to_string();

    let dir = tempfile::tempdir().unwrap();
    let path = capture_to_file("cv", dir.path(), &config).await.unwrap();

    assert_eq!(path.file_name().unwrap(), "Jane_Doe_ATS_CV.pdf");
    let bytes = std::fs::read(&path).unwrap();
    assert_is_pdf(&bytes);
    // No temp file left behind.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

// ── Observer ─────────────────────────────────────────────────────────────

struct CountingObserver {
    stages: AtomicUsize,
    pages: AtomicUsize,
    completed: AtomicBool,
}

impl CaptureObserver for CountingObserver {
    fn on_stage(&self, _stage: CaptureStage) {
        self.stages.fetch_add(1, Ordering::SeqCst);
    }

    fn on_page(&self, _page_num: usize, _page_count: usize) {
        self.pages.fetch_add(1, Ordering::SeqCst);
    }

    fn on_capture_complete(&self, _page_count: usize, _link_count: usize) {
        self.completed.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn observer_sees_every_stage_and_page() {
    let host = Arc::new(MockHost::new(vec![("cv", doc(2500.0, vec![]))]));
    let observer = Arc::new(CountingObserver {
        stages: AtomicUsize::new(0),
        pages: AtomicUsize::new(0),
        completed: AtomicBool::new(false),
    });
    let mut config = unit_config(host);
    config.observer = Some(observer.clone());

    let artifact = capture("cv", &config).await.unwrap();

    // Filter, AwaitAssets, Rasterize, Paginate, Assemble.
    assert_eq!(observer.stages.load(Ordering::SeqCst), 5);
    assert_eq!(observer.pages.load(Ordering::SeqCst), artifact.page_count());
    assert!(observer.completed.load(Ordering::SeqCst));
}
