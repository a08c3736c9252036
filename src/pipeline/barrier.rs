//! Readiness barrier: wait, boundedly, until the clone is safe to paint.
//!
//! Rasterizing before web fonts have swapped in or images have decoded
//! produces a capture with fallback glyphs and blank rectangles. The
//! barrier holds the pipeline until the mounted clone reports ready, but
//! every wait carries a bound, so a dead image URL or a misbehaving host
//! can delay a capture, never hang it.
//!
//! Three legs run concurrently and the barrier completes when the slowest
//! finishes:
//!
//! 1. a fixed settle delay (late style application on the fresh mount),
//! 2. the host's fonts-ready signal under a guard timeout,
//! 3. one wait per embedded image, each under the per-asset timeout; a
//!    load *failure* resolves the wait too — only silence runs the clock.
//!
//! Expired bounds are recorded in the [`BarrierReport`] and logged as
//! warnings. They are never errors: the capture proceeds treating the
//! stragglers as ready.

use crate::config::CaptureConfig;
use crate::host::RenderSurface;
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

/// What the barrier observed; folded into
/// [`crate::output::CaptureStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarrierReport {
    /// The fonts-ready guard expired before the host signalled.
    pub fonts_timed_out: bool,
    /// Images whose load wait expired.
    pub timed_out_assets: usize,
    /// Images the surface reported at mount time.
    pub total_assets: usize,
}

/// Run the readiness barrier against a mounted surface.
///
/// Worst-case duration is
/// `max(settle_delay, fonts_timeout, asset_timeout)`: the legs are
/// awaited concurrently, not in sequence.
pub async fn await_readiness(surface: &dyn RenderSurface, config: &CaptureConfig) -> BarrierReport {
    let image_waits = surface.image_loads();
    let total_assets = image_waits.len();

    let settle = tokio::time::sleep(config.settle_delay);
    let fonts = timeout(config.fonts_timeout, surface.fonts_ready());
    let images = join_all(
        image_waits
            .into_iter()
            .map(|wait| timeout(config.asset_timeout, wait)),
    );

    let (_, fonts_result, image_results) = tokio::join!(settle, fonts, images);

    let fonts_timed_out = fonts_result.is_err();
    if fonts_timed_out {
        warn!(
            timeout_ms = config.fonts_timeout.as_millis() as u64,
            "fonts not ready within guard timeout; capturing anyway"
        );
    }

    let timed_out_assets = image_results.iter().filter(|r| r.is_err()).count();
    if timed_out_assets > 0 {
        warn!(
            timed_out_assets,
            total_assets,
            timeout_ms = config.asset_timeout.as_millis() as u64,
            "image loads still pending at timeout; treating as ready"
        );
    }

    debug!(total_assets, fonts_timed_out, timed_out_assets, "readiness barrier done");

    BarrierReport {
        fonts_timed_out,
        timed_out_assets,
        total_assets,
    }
}
