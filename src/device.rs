use crate::types::{Facing, LightDeviceInfo, TorchCapability};
use crate::Result;

/// A controllable light-emitting device.
///
/// The control thread owns the handle exclusively; implementations only need
/// to be `Send`. Commands may perform blocking I/O and are expected to be
/// fast; there is no timeout or cancellation.
pub trait TorchDevice: Send {
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;
}

/// Platform boundary that lists lighting-capable devices and opens handles.
pub trait LightEnumerator {
    fn enumerate(&self) -> Result<Vec<LightDeviceInfo>>;
    fn open(&self, id: &str) -> Result<Box<dyn TorchDevice>>;
}

/// Run light-device discovery once at startup.
///
/// Filters the enumeration to devices that report an emitter and are
/// associated with the rear/primary sensor, and picks the first match in
/// enumeration order. Enumeration failure or no match both yield
/// `available: false` — absence of a light is a supported outcome, not an
/// error, so nothing propagates to the caller.
pub fn discover(enumerator: &dyn LightEnumerator) -> TorchCapability {
    let devices = match enumerator.enumerate() {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Light enumeration failed: {}", e);
            return TorchCapability::unavailable();
        }
    };

    let selected = devices
        .iter()
        .find(|d| d.has_emitter && d.facing == Facing::Rear);

    match selected {
        Some(info) => {
            log::info!("Selected light device {}", info.id);
            TorchCapability {
                device_id: Some(info.id.clone()),
                available: true,
            }
        }
        None => {
            log::info!(
                "No rear-facing light emitter among {} device(s)",
                devices.len()
            );
            TorchCapability::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TorchError;

    struct StubEnumerator {
        devices: Vec<LightDeviceInfo>,
        fail: bool,
    }

    impl LightEnumerator for StubEnumerator {
        fn enumerate(&self) -> Result<Vec<LightDeviceInfo>> {
            if self.fail {
                Err(TorchError::DeviceNotFound)
            } else {
                Ok(self.devices.clone())
            }
        }

        fn open(&self, _id: &str) -> Result<Box<dyn TorchDevice>> {
            Err(TorchError::DeviceNotFound)
        }
    }

    fn info(id: &str, has_emitter: bool, facing: Facing) -> LightDeviceInfo {
        LightDeviceInfo {
            id: id.to_string(),
            has_emitter,
            facing,
        }
    }

    #[test]
    fn picks_first_rear_emitter_in_order() {
        let enumerator = StubEnumerator {
            devices: vec![
                info("front-0", true, Facing::Front),
                info("rear-no-emitter", false, Facing::Rear),
                info("rear-1", true, Facing::Rear),
                info("rear-2", true, Facing::Rear),
            ],
            fail: false,
        };
        let cap = discover(&enumerator);
        assert!(cap.available);
        assert_eq!(cap.device_id.as_deref(), Some("rear-1"));
    }

    #[test]
    fn no_match_is_unavailable_not_error() {
        let enumerator = StubEnumerator {
            devices: vec![info("front-0", true, Facing::Front)],
            fail: false,
        };
        let cap = discover(&enumerator);
        assert!(!cap.available);
        assert!(cap.device_id.is_none());
    }

    #[test]
    fn enumeration_failure_is_swallowed() {
        let enumerator = StubEnumerator {
            devices: vec![],
            fail: true,
        };
        let cap = discover(&enumerator);
        assert!(!cap.available);
        assert!(cap.device_id.is_none());
    }
}
