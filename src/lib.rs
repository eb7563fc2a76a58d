//! # torchsync - Illumination Control and Telemetry Sync
//!
//! Light/torch control and status-HUD plumbing for hosts built around an
//! opaque tracking engine. Provides:
//! - Light-device discovery with a hidapi backend for USB HID illuminators
//! - An AUTO/ON/OFF mode controller that arbitrates user choice against the
//!   engine's ambient-light signal on a single control thread
//! - A cancellable fixed-interval telemetry poller that never crashes the host
//! - Display-rotation mapping for the engine boundary
//!
//! ## Quick Start
//! ```no_run
//! use torchsync::{HidLightEnumerator, TelemetryPoller, TorchController, TorchMode};
//! use std::time::Duration;
//!
//! let enumerator = HidLightEnumerator::new().unwrap();
//! let controller = TorchController::discover(&enumerator);
//! controller.set_mode(TorchMode::On);
//!
//! // Engine and sink are host-provided TrackingEngine / RenderSink impls.
//! # let engine: std::sync::Arc<dyn torchsync::TrackingEngine> = unimplemented!();
//! # let sink: std::sync::Arc<dyn torchsync::RenderSink> = unimplemented!();
//! let mut poller = TelemetryPoller::new(engine, sink);
//! poller.start(Duration::from_millis(100));
//! ```

pub mod controller;
pub mod device;
pub mod engine;
pub mod error;
pub mod hid;
pub mod orientation;
pub mod telemetry;
pub mod types;

pub use controller::{ControlHandle, TorchController};
pub use device::{discover, LightEnumerator, TorchDevice};
pub use engine::{RenderSink, TrackingEngine};
pub use error::TorchError;
pub use hid::HidLightEnumerator;
pub use orientation::{sync_orientation, Orientation};
pub use telemetry::{format_snapshot, TelemetryPoller, FALLBACK_TEXT};
pub use types::*;

/// Result type alias for torchsync operations.
pub type Result<T> = std::result::Result<T, TorchError>;
