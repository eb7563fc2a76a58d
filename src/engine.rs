use crate::types::{DepthMeshMode, TelemetrySnapshot};
use crate::Orientation;
use crate::Result;

/// Boundary to the opaque tracking/mapping engine.
///
/// `fetch_snapshot` is called synchronously from the poller thread and is
/// expected to return quickly or fail fast; a slow fetch directly extends the
/// polling period. The remaining methods are fire-and-forget commands that
/// either succeed or silently no-op inside the engine.
///
/// The engine drives AUTO-mode lighting in the other direction: it holds a
/// [`ControlHandle`](crate::controller::ControlHandle) and calls
/// `auto_signal` from its own execution context.
pub trait TrackingEngine: Send + Sync {
    /// Read one atomic status snapshot. May fail; the caller absorbs failures.
    fn fetch_snapshot(&self) -> Result<TelemetrySnapshot>;

    fn set_orientation(&self, orientation: Orientation);
    fn clear_map_state(&self);
    fn clear_mesh_state(&self);
    fn set_map_enabled(&self, enabled: bool);
    fn set_planes_enabled(&self, enabled: bool);
    fn set_wireframe_enabled(&self, enabled: bool);
    fn set_depth_mesh_mode(&self, mode: DepthMeshMode);
}

/// Output sink for formatted telemetry text, implemented by the presentation
/// layer. Assumed non-blocking and non-throwing from this crate's perspective.
pub trait RenderSink: Send + Sync {
    fn render(&self, text: &str);
}
