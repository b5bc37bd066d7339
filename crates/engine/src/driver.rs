//! The fixed-cadence tick driver.
//!
//! Single-threaded, cooperative: one loop sleeps the tick interval, then
//! runs Clock → State Machine → Compositor → Mixer through
//! [`PlaybackSession::tick`]. Stopping the driver — by reaching the
//! terminal state or dropping out of the loop — is the only cancellation
//! primitive; nothing in a tick blocks, so nothing needs unwinding.

use std::time::{Duration, Instant};

use cadence_common::timing;
use cadence_compositor::FrameStore;
use tracing::info;

use crate::error::EngineResult;
use crate::session::{PlaybackSession, StreamFrame, TickOutcome};

/// Drive a session until the program is over.
///
/// `frames_for` supplies the per-tick store of decoded rasters (the host's
/// decode boundary); `on_frame` receives each composed stream pair — the
/// content-sharing capture point.
pub fn run<F, G>(
    session: &mut PlaybackSession,
    mut frames_for: F,
    mut on_frame: G,
) -> EngineResult<()>
where
    F: FnMut() -> FrameStore,
    G: FnMut(StreamFrame<'_>),
{
    let interval = Duration::from_millis(timing::TICK_INTERVAL_MS as u64);
    let mut last = Instant::now();

    loop {
        std::thread::sleep(interval);
        let now = Instant::now();
        let dt_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        let frames = frames_for();
        match session.tick(dt_ms, &frames)? {
            TickOutcome::Rendered => on_frame(session.output()),
            TickOutcome::Finished => {
                info!("Tick driver stopped");
                return Ok(());
            }
        }
    }
}
