//! HUD demo: wires a simulated tracking engine to a stdout render sink and
//! exercises mode arbitration plus orientation sync.
//!
//! Run with: `RUST_LOG=info cargo run --example hud`

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use torchsync::{
    sync_orientation, DepthMeshMode, HidLightEnumerator, Orientation, RenderSink,
    TelemetryPoller, TelemetrySnapshot, TorchController, TorchMode, TrackingEngine,
};

/// Engine stand-in: fails its first fetches while "initializing", then tracks.
struct SimulatedEngine {
    frame: AtomicU32,
}

impl TrackingEngine for SimulatedEngine {
    fn fetch_snapshot(&self) -> torchsync::Result<TelemetrySnapshot> {
        let frame = self.frame.fetch_add(1, Ordering::Relaxed);
        if frame < 3 {
            return Err(torchsync::TorchError::Snapshot("warming up".into()));
        }
        Ok(TelemetrySnapshot {
            tracking_state: "TRACKING".into(),
            point_count: 120 + frame % 40,
            map_points: 64 + frame,
            tracked_features: 80,
            stable_tracks: 52,
            avg_track_age: 7.4,
            fps: 29.7,
            ..TelemetrySnapshot::default()
        })
    }

    fn set_orientation(&self, orientation: Orientation) {
        log::info!("engine orientation = {}", orientation.index());
    }

    fn clear_map_state(&self) {
        log::info!("engine map cleared");
    }

    fn clear_mesh_state(&self) {
        log::info!("engine mesh cleared");
    }

    fn set_map_enabled(&self, enabled: bool) {
        log::info!("engine map enabled = {}", enabled);
    }

    fn set_planes_enabled(&self, enabled: bool) {
        log::info!("engine planes enabled = {}", enabled);
    }

    fn set_wireframe_enabled(&self, enabled: bool) {
        log::info!("engine wireframe enabled = {}", enabled);
    }

    fn set_depth_mesh_mode(&self, mode: DepthMeshMode) {
        log::info!("engine depth mesh mode = {}", mode.label());
    }
}

struct StdoutSink;

impl RenderSink for StdoutSink {
    fn render(&self, text: &str) {
        println!("--- HUD ---\n{}\n", text);
    }
}

fn main() {
    env_logger::init();

    let controller = match HidLightEnumerator::new() {
        Ok(enumerator) => TorchController::discover(&enumerator),
        Err(e) => {
            log::warn!("HID unavailable ({}), running without a light", e);
            TorchController::start(torchsync::TorchCapability::unavailable(), None)
        }
    };
    println!("light available: {}", controller.is_available());

    let engine = Arc::new(SimulatedEngine {
        frame: AtomicU32::new(0),
    });
    let sink = Arc::new(StdoutSink);

    engine.set_map_enabled(true);
    engine.set_planes_enabled(true);
    engine.set_depth_mesh_mode(DepthMeshMode::Off);
    sync_orientation(engine.as_ref(), 1);

    let mut poller = TelemetryPoller::new(engine.clone(), sink);
    poller.start(Duration::from_millis(100));

    // Simulate the engine's ambient-light decisions while in AUTO.
    let handle = controller.handle();
    handle.auto_signal(true);
    std::thread::sleep(Duration::from_millis(400));

    // User pins the light on, then off.
    controller.set_mode(TorchMode::On);
    std::thread::sleep(Duration::from_millis(400));
    controller.set_mode(TorchMode::Off);
    std::thread::sleep(Duration::from_millis(400));

    engine.clear_map_state();
    engine.clear_mesh_state();
    engine.set_wireframe_enabled(false);

    poller.stop();
    controller.stop();
}
