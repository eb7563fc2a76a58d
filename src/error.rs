/// Errors raised while driving the light device or the engine boundary.
///
/// Per the subsystem's propagation policy these are absorbed close to where
/// they occur: hardware command failures are logged by the control thread and
/// snapshot failures are logged by the poller. None of them may terminate
/// either loop.
#[derive(Debug, thiserror::Error)]
pub enum TorchError {
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("light device not found")]
    DeviceNotFound,

    #[error("hardware command failed: {0}")]
    Command(String),

    #[error("snapshot unavailable: {0}")]
    Snapshot(String),

    #[error("control channel disconnected")]
    ChannelDisconnected,
}
