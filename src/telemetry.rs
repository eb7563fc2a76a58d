use crate::engine::{RenderSink, TrackingEngine};
use crate::types::{TelemetrySnapshot, TorchMode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Text rendered for a cycle whose snapshot fetch failed.
pub const FALLBACK_TEXT: &str = "Stats unavailable";

struct Session {
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

/// Fixed-interval telemetry loop.
///
/// While active, a background thread fetches one snapshot per cycle from the
/// engine boundary, formats it, and hands the text to the render sink. The
/// interval is measured from the end of the previous cycle, so a slow fetch
/// stretches the period rather than piling up cycles. A session can be torn
/// down and recreated any number of times.
pub struct TelemetryPoller {
    engine: Arc<dyn TrackingEngine>,
    sink: Arc<dyn RenderSink>,
    session: Option<Session>,
}

impl TelemetryPoller {
    pub fn new(engine: Arc<dyn TrackingEngine>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            engine,
            sink,
            session: None,
        }
    }

    /// Start polling. Idempotent: calling while active is a no-op and never
    /// creates a second concurrent loop.
    pub fn start(&mut self, interval: Duration) {
        if self.session.is_some() {
            log::debug!("Telemetry poller already active, start ignored");
            return;
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();
        let engine = self.engine.clone();
        let sink = self.sink.clone();

        let thread = std::thread::Builder::new()
            .name("torchsync-telemetry".into())
            .spawn(move || poll_loop(&*engine, &*sink, interval, &stop_clone))
            .map_err(|e| log::warn!("Failed to spawn telemetry thread: {}", e))
            .ok();

        if thread.is_some() {
            self.session = Some(Session { stop_flag, thread });
        }
    }

    /// Stop polling and wait for the loop to observe the flag.
    ///
    /// A fetch already in flight completes but its result is discarded; after
    /// this returns no further render calls occur for the stopped session.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop_flag.store(true, Ordering::Relaxed);
            if let Some(thread) = session.thread.take() {
                let _ = thread.join();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for TelemetryPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(
    engine: &dyn TrackingEngine,
    sink: &dyn RenderSink,
    interval: Duration,
    stop_flag: &AtomicBool,
) {
    log::info!("Telemetry poller started ({} ms interval)", interval.as_millis());

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        // A fetch failure costs one cycle, never the loop.
        let text = match engine.fetch_snapshot() {
            Ok(snapshot) => format_snapshot(&snapshot),
            Err(e) => {
                log::warn!("Snapshot fetch failed: {}", e);
                FALLBACK_TEXT.to_string()
            }
        };

        // Discard the result of a fetch that was in flight during stop().
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
        sink.render(&text);

        wait_interval(stop_flag, interval);
    }

    log::info!("Telemetry poller stopping (stop flag set)");
}

/// Sleep for one inter-cycle interval, in short steps so a stop request is
/// observed well within the interval.
fn wait_interval(stop_flag: &AtomicBool, interval: Duration) {
    const STEP: Duration = Duration::from_millis(20);
    let deadline = Instant::now() + interval;
    while !stop_flag.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(STEP));
    }
}

/// Format a snapshot into the HUD text block.
pub fn format_snapshot(s: &TelemetrySnapshot) -> String {
    use crate::types::FeatureFlags;

    let torch_state = if !s.torch_available {
        "UNAVAILABLE".to_string()
    } else if s.torch_mode == TorchMode::Auto {
        format!("AUTO ({})", if s.torch_enabled { "ON" } else { "OFF" })
    } else {
        s.torch_mode.label().to_string()
    };
    let depth_state = if s.depth_supported {
        format!("{} {}", s.depth_mode, if s.depth_enabled { "ON" } else { "OFF" })
    } else {
        "UNSUPPORTED".to_string()
    };
    let mesh_state = if s.depth_supported {
        s.depth_mesh_mode.label().to_string()
    } else {
        "UNSUPPORTED".to_string()
    };
    let on_off = |flag: FeatureFlags| if s.features.contains(flag) { "ON" } else { "OFF" };

    format!(
        "Track: {}\n\
         Fail: {}\n\
         Points: {}\n\
         Map: {} (B:{} M:{})\n\
         Tracks: {} (Stable: {})\n\
         Avg age: {:.1}\n\
         Depth hit: {:.0}%\n\
         Depth: {} ({}x{})\n\
         Depth min/max: {:.2} / {:.2} m\n\
         Mesh: {} ({}x{}) valid={:.0}%\n\
         Planes: {} / Wire: {}\n\
         Voxels: {} (fused/s: {})\n\
         FPS: {:.1}\n\
         Torch: {}\n\
         Map: {} / Overlay: {}",
        s.tracking_state,
        s.last_failure_reason,
        s.point_count,
        s.map_points,
        s.bearing_landmarks,
        s.metric_landmarks,
        s.tracked_features,
        s.stable_tracks,
        s.avg_track_age,
        s.depth_hit_rate,
        depth_state,
        s.depth_width,
        s.depth_height,
        s.depth_min_m,
        s.depth_max_m,
        mesh_state,
        s.depth_mesh_width,
        s.depth_mesh_height,
        s.depth_mesh_valid_ratio * 100.0,
        on_off(FeatureFlags::PLANES),
        on_off(FeatureFlags::WIREFRAME),
        s.voxels_used,
        s.points_fused_per_second,
        s.fps,
        torch_state,
        on_off(FeatureFlags::MAP),
        on_off(FeatureFlags::DEPTH_OVERLAY),
    )
}
