use crate::engine::TrackingEngine;

/// Display rotation in the engine's representation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}

impl Orientation {
    /// Total mapping from the platform's 4 rotation values. Anything
    /// unrecognized falls back to `Deg0`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Orientation::Deg90,
            2 => Orientation::Deg180,
            3 => Orientation::Deg270,
            _ => Orientation::Deg0,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Forward a raw platform rotation to the engine boundary.
///
/// Stateless and safe to call redundantly; hosts invoke it on resume, on
/// configuration change, and on display-topology change.
pub fn sync_orientation(engine: &dyn TrackingEngine, raw: i32) {
    engine.set_orientation(Orientation::from_raw(raw));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepthMeshMode, TelemetrySnapshot};
    use crate::Result;
    use std::sync::Mutex;

    #[test]
    fn defined_inputs_map_to_distinct_indices() {
        assert_eq!(Orientation::from_raw(0).index(), 0);
        assert_eq!(Orientation::from_raw(1).index(), 1);
        assert_eq!(Orientation::from_raw(2).index(), 2);
        assert_eq!(Orientation::from_raw(3).index(), 3);
    }

    #[test]
    fn unrecognized_inputs_fall_back_to_zero() {
        assert_eq!(Orientation::from_raw(-1), Orientation::Deg0);
        assert_eq!(Orientation::from_raw(4), Orientation::Deg0);
        assert_eq!(Orientation::from_raw(i32::MAX), Orientation::Deg0);
    }

    #[derive(Default)]
    struct RecordingEngine {
        orientations: Mutex<Vec<Orientation>>,
    }

    impl TrackingEngine for RecordingEngine {
        fn fetch_snapshot(&self) -> Result<TelemetrySnapshot> {
            Ok(TelemetrySnapshot::default())
        }

        fn set_orientation(&self, orientation: Orientation) {
            self.orientations.lock().unwrap().push(orientation);
        }

        fn clear_map_state(&self) {}
        fn clear_mesh_state(&self) {}
        fn set_map_enabled(&self, _enabled: bool) {}
        fn set_planes_enabled(&self, _enabled: bool) {}
        fn set_wireframe_enabled(&self, _enabled: bool) {}
        fn set_depth_mesh_mode(&self, _mode: DepthMeshMode) {}
    }

    #[test]
    fn sync_forwards_mapped_value() {
        let engine = RecordingEngine::default();
        sync_orientation(&engine, 3);
        sync_orientation(&engine, 3);
        sync_orientation(&engine, 99);
        assert_eq!(
            *engine.orientations.lock().unwrap(),
            vec![Orientation::Deg270, Orientation::Deg270, Orientation::Deg0]
        );
    }
}
