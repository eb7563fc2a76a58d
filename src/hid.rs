use crate::device::{LightEnumerator, TorchDevice};
use crate::types::{Facing, LightDeviceInfo};
use crate::{Result, TorchError};
use hidapi::{HidApi, HidDevice};

/// Known USB HID illuminator devices (VID, PID).
const KNOWN_LAMPS: &[(u16, u16)] = &[
    (0x27B8, 0x01ED), // ThingM blink(1)
    (0x04D8, 0xF372), // Luxafor Flag
    (0x27BB, 0x3BCD), // Kuando Busylight
];

/// Output report written to switch the lamp: report ID, on/off, brightness,
/// padding to the fixed report size.
const REPORT_SIZE: usize = 9;
const REPORT_ID: u8 = 0x01;
const FULL_BRIGHTNESS: u8 = 0xFF;

fn is_known_lamp(vendor_id: u16, product_id: u16) -> bool {
    KNOWN_LAMPS
        .iter()
        .any(|&(vid, pid)| vid == vendor_id && pid == product_id)
}

/// The primary interface (0, or -1 on macOS IOKit where it is the only HID
/// interface) is treated as the rear-associated emitter.
fn facing_for_interface(interface_number: i32) -> Facing {
    match interface_number {
        0 | -1 => Facing::Rear,
        n if n > 0 => Facing::Front,
        _ => Facing::Unknown,
    }
}

fn build_light_report(enabled: bool) -> [u8; REPORT_SIZE] {
    let mut report = [0u8; REPORT_SIZE];
    report[0] = REPORT_ID;
    report[1] = u8::from(enabled);
    report[2] = if enabled { FULL_BRIGHTNESS } else { 0 };
    report
}

fn create_hid_api() -> Result<HidApi> {
    let api = HidApi::new()?;
    #[cfg(target_os = "macos")]
    {
        // Keep HID opens shared on macOS to avoid seizing the interface.
        api.set_open_exclusive(false);
    }
    Ok(api)
}

/// hidapi-backed light enumeration for USB HID illuminators.
pub struct HidLightEnumerator {
    api: HidApi,
}

impl HidLightEnumerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: create_hid_api()?,
        })
    }
}

impl LightEnumerator for HidLightEnumerator {
    fn enumerate(&self) -> Result<Vec<LightDeviceInfo>> {
        let mut devices = Vec::new();
        for info in self.api.device_list() {
            if !is_known_lamp(info.vendor_id(), info.product_id()) {
                continue;
            }
            let Ok(path) = info.path().to_str() else {
                log::warn!("Skipping lamp with non-UTF8 path at {:?}", info.path());
                continue;
            };
            devices.push(LightDeviceInfo {
                id: path.to_string(),
                has_emitter: true,
                facing: facing_for_interface(info.interface_number()),
            });
        }
        Ok(devices)
    }

    fn open(&self, id: &str) -> Result<Box<dyn TorchDevice>> {
        let path = std::ffi::CString::new(id).map_err(|_| TorchError::DeviceNotFound)?;
        let device = self.api.open_path(&path)?;
        log::info!("Opened HID lamp at {}", id);
        Ok(Box::new(HidTorch { device }))
    }
}

/// One opened HID lamp. Owned exclusively by the control thread.
pub struct HidTorch {
    device: HidDevice,
}

impl TorchDevice for HidTorch {
    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let report = build_light_report(enabled);
        let written = self.device.write(&report)?;
        if written < REPORT_SIZE {
            return Err(TorchError::Command(format!(
                "short report write: {} of {} bytes",
                written, REPORT_SIZE
            )));
        }
        Ok(())
    }
}
