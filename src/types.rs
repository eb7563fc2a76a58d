/// User-selected lighting mode.
///
/// In `Auto` the hardware state follows the engine's ambient-light decision;
/// `On`/`Off` pin it to the user's choice.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TorchMode {
    #[default]
    Auto = 0,
    On = 1,
    Off = 2,
}

impl TorchMode {
    /// Label used in the telemetry HUD.
    pub fn label(self) -> &'static str {
        match self {
            TorchMode::Auto => "AUTO",
            TorchMode::On => "ON",
            TorchMode::Off => "OFF",
        }
    }
}

/// Combined logical/hardware light state.
///
/// `hardware_enabled` reflects the last command issued to the device, which in
/// `Auto` mode is driven by the engine signal rather than `mode` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightState {
    pub mode: TorchMode,
    pub hardware_enabled: bool,
}

/// Result of light-device discovery. Computed once at startup and immutable
/// for the process lifetime; absence of a light is a normal outcome.
#[derive(Debug, Clone, Default)]
pub struct TorchCapability {
    /// Enumerator-scoped identifier of the selected device, if any.
    pub device_id: Option<String>,
    pub available: bool,
}

impl TorchCapability {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Which sensor a light-emitting device is associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Primary / rear-facing sensor.
    Rear,
    Front,
    Unknown,
}

/// One enumerated lighting-capable device, as reported by a
/// [`LightEnumerator`](crate::device::LightEnumerator).
#[derive(Debug, Clone)]
pub struct LightDeviceInfo {
    pub id: String,
    pub has_emitter: bool,
    pub facing: Facing,
}

/// Depth-mesh rendering mode forwarded to the engine boundary.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthMeshMode {
    #[default]
    Off = 0,
    Depth = 1,
    Raw = 2,
}

impl DepthMeshMode {
    pub fn label(self) -> &'static str {
        match self {
            DepthMeshMode::Off => "OFF",
            DepthMeshMode::Depth => "DEPTH",
            DepthMeshMode::Raw => "RAW",
        }
    }
}

bitflags::bitflags! {
    /// Per-feature enabled flags carried in a [`TelemetrySnapshot`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FeatureFlags: u32 {
        const MAP           = 1 << 0;
        const PLANES        = 1 << 1;
        const WIREFRAME     = 1 << 2;
        const DEPTH_OVERLAY = 1 << 3;
    }
}

/// One immutable point-in-time read of the tracking engine's status.
///
/// Produced atomically by the engine boundary; this crate only formats it.
#[derive(Debug, Clone)]
pub struct TelemetrySnapshot {
    pub tracking_state: String,
    pub last_failure_reason: String,
    pub point_count: u32,
    pub map_points: u32,
    pub bearing_landmarks: u32,
    pub metric_landmarks: u32,
    pub tracked_features: u32,
    pub stable_tracks: u32,
    pub avg_track_age: f32,
    /// Percent of tracked features with a valid depth sample.
    pub depth_hit_rate: f32,
    pub fps: f32,
    pub torch_mode: TorchMode,
    pub torch_enabled: bool,
    pub torch_available: bool,
    pub depth_supported: bool,
    pub depth_enabled: bool,
    pub depth_mode: String,
    pub depth_width: u32,
    pub depth_height: u32,
    pub depth_min_m: f32,
    pub depth_max_m: f32,
    pub depth_mesh_mode: DepthMeshMode,
    pub depth_mesh_width: u32,
    pub depth_mesh_height: u32,
    pub depth_mesh_valid_ratio: f32,
    pub voxels_used: u32,
    pub points_fused_per_second: u32,
    pub features: FeatureFlags,
}

impl Default for TelemetrySnapshot {
    /// Engine boot state, before the first tracked frame.
    fn default() -> Self {
        Self {
            tracking_state: "INITIALIZING".to_string(),
            last_failure_reason: "NONE".to_string(),
            point_count: 0,
            map_points: 0,
            bearing_landmarks: 0,
            metric_landmarks: 0,
            tracked_features: 0,
            stable_tracks: 0,
            avg_track_age: 0.0,
            depth_hit_rate: 0.0,
            fps: 0.0,
            torch_mode: TorchMode::Auto,
            torch_enabled: false,
            torch_available: false,
            depth_supported: false,
            depth_enabled: false,
            depth_mode: "OFF".to_string(),
            depth_width: 0,
            depth_height: 0,
            depth_min_m: 0.0,
            depth_max_m: 0.0,
            depth_mesh_mode: DepthMeshMode::Off,
            depth_mesh_width: 0,
            depth_mesh_height: 0,
            depth_mesh_valid_ratio: 0.0,
            voxels_used: 0,
            points_fused_per_second: 0,
            features: FeatureFlags::MAP | FeatureFlags::PLANES,
        }
    }
}
