use crate::device::{LightEnumerator, TorchDevice};
use crate::types::{LightState, TorchCapability, TorchMode};
use crate::TorchError;
use crossbeam_channel::{Receiver, Sender};
use std::sync::{Arc, Mutex};

enum ControlCommand {
    SetMode(TorchMode),
    AutoSignal(bool),
    Shutdown,
}

/// Cloneable, thread-safe entry point into the control thread.
///
/// The engine boundary holds one of these and calls [`auto_signal`] from its
/// own execution context; the command is marshalled onto the control thread
/// rather than touching the device handle directly.
///
/// [`auto_signal`]: ControlHandle::auto_signal
#[derive(Clone)]
pub struct ControlHandle {
    sender: Sender<ControlCommand>,
}

impl ControlHandle {
    /// Select AUTO/ON/OFF. ON/OFF issue the matching hardware command when it
    /// differs from the last issued one; AUTO defers to the next auto signal.
    pub fn set_mode(&self, mode: TorchMode) {
        if self.sender.send(ControlCommand::SetMode(mode)).is_err() {
            log::debug!(
                "set_mode({}) dropped: {}",
                mode.label(),
                TorchError::ChannelDisconnected
            );
        }
    }

    /// Engine's ambient-light decision. Effective only while mode is AUTO;
    /// ignored otherwise so a stale signal cannot override a user choice.
    pub fn auto_signal(&self, enable: bool) {
        if self.sender.send(ControlCommand::AutoSignal(enable)).is_err() {
            log::debug!(
                "auto_signal({}) dropped: {}",
                enable,
                TorchError::ChannelDisconnected
            );
        }
    }
}

/// Single writer of light hardware state.
///
/// Owns a control thread that drains a command queue: every mutation, whether
/// a UI mode selection or an engine auto signal, is applied there in arrival
/// order. Redundant commands are debounced so the device only sees actual
/// state changes.
pub struct TorchController {
    handle: ControlHandle,
    state: Arc<Mutex<LightState>>,
    capability: TorchCapability,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl TorchController {
    /// Start the control thread with an already-discovered capability.
    ///
    /// `device` is the opened handle for `capability.device_id`; passing
    /// `None` leaves the controller in the unavailable state regardless of
    /// the capability flag.
    pub fn start(capability: TorchCapability, device: Option<Box<dyn TorchDevice>>) -> Self {
        let available = capability.available && device.is_some();
        if capability.available && !available {
            log::warn!("No light device handle, treating torch as unavailable");
        }
        // is_available() must match what the control thread can actually do.
        let capability = TorchCapability {
            available,
            ..capability
        };
        let state = Arc::new(Mutex::new(LightState::default()));
        let (sender, receiver) = crossbeam_channel::unbounded();

        let mut ctx = ControlContext {
            device,
            available,
            state: state.clone(),
            last_issued: None,
        };

        // Thread spawn only fails on resource exhaustion; fall back to an
        // inert controller rather than propagating, matching the rule that
        // light trouble never crashes the host.
        let thread = std::thread::Builder::new()
            .name("torchsync-control".into())
            .spawn(move || control_loop(&mut ctx, &receiver))
            .map_err(|e| log::warn!("Failed to spawn control thread: {}", e))
            .ok();

        TorchController {
            handle: ControlHandle { sender },
            state,
            capability,
            thread,
        }
    }

    /// Run discovery and open the selected device in one step.
    ///
    /// An open failure is logged and degrades to unavailable; like a missing
    /// device it is a normal outcome, not an error.
    pub fn discover(enumerator: &dyn LightEnumerator) -> Self {
        let capability = crate::device::discover(enumerator);
        let device = match capability.device_id.as_deref() {
            Some(id) => match enumerator.open(id) {
                Ok(device) => Some(device),
                Err(e) => {
                    log::warn!("Failed to open light device {}: {}", id, e);
                    None
                }
            },
            None => None,
        };
        Self::start(capability, device)
    }

    pub fn set_mode(&self, mode: TorchMode) {
        self.handle.set_mode(mode);
    }

    pub fn auto_signal(&self, enable: bool) {
        self.handle.auto_signal(enable);
    }

    /// Handle for the engine boundary and other threads.
    pub fn handle(&self) -> ControlHandle {
        self.handle.clone()
    }

    pub fn is_available(&self) -> bool {
        self.capability.available
    }

    pub fn capability(&self) -> &TorchCapability {
        &self.capability
    }

    /// Current logical/hardware state as last written by the control thread.
    pub fn state(&self) -> LightState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Stop the control thread after draining queued commands.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.handle.sender.send(ControlCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for TorchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State owned by the control thread. Nothing else touches the device handle.
struct ControlContext {
    device: Option<Box<dyn TorchDevice>>,
    available: bool,
    state: Arc<Mutex<LightState>>,
    last_issued: Option<bool>,
}

impl ControlContext {
    fn apply_mode(&mut self, mode: TorchMode) {
        self.write_state(|s| s.mode = mode);
        log::info!("Torch mode set to {}", mode.label());

        if !self.available {
            return;
        }
        match mode {
            TorchMode::On => self.issue(true),
            TorchMode::Off => self.issue(false),
            // Hardware follows the next auto signal.
            TorchMode::Auto => {}
        }
    }

    fn apply_auto(&mut self, enable: bool) {
        let mode = self.read_state().mode;
        if mode != TorchMode::Auto {
            log::trace!("Auto signal {} ignored in {} mode", enable, mode.label());
            return;
        }
        if !self.available {
            return;
        }
        self.issue(enable);
    }

    /// Issue a hardware command, suppressing repeats of the last issued one.
    ///
    /// A driver failure is logged and the recorded state kept; the device may
    /// be indeterminate but the next differing command is attempted normally,
    /// with no retry of this one.
    fn issue(&mut self, enable: bool) {
        if self.last_issued == Some(enable) {
            return;
        }
        self.last_issued = Some(enable);

        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.set_enabled(enable) {
                log::warn!(
                    "Torch {} command failed: {}",
                    if enable { "enable" } else { "disable" },
                    e
                );
            }
        }
        self.write_state(|s| s.hardware_enabled = enable);
    }

    fn read_state(&self) -> LightState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn write_state(&self, f: impl FnOnce(&mut LightState)) {
        match self.state.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

fn control_loop(ctx: &mut ControlContext, receiver: &Receiver<ControlCommand>) {
    log::info!(
        "Torch control thread started (available={})",
        ctx.available
    );

    while let Ok(command) = receiver.recv() {
        match command {
            ControlCommand::SetMode(mode) => ctx.apply_mode(mode),
            ControlCommand::AutoSignal(enable) => ctx.apply_auto(enable),
            ControlCommand::Shutdown => break,
        }
    }

    log::info!("Torch control thread stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Facing, LightDeviceInfo};
    use crate::TorchError;

    struct FakeDevice {
        commands: Arc<Mutex<Vec<bool>>>,
        fail: bool,
    }

    impl TorchDevice for FakeDevice {
        fn set_enabled(&mut self, enabled: bool) -> crate::Result<()> {
            self.commands.lock().unwrap().push(enabled);
            if self.fail {
                Err(TorchError::Command("injected".into()))
            } else {
                Ok(())
            }
        }
    }

    fn available_controller(fail: bool) -> (TorchController, Arc<Mutex<Vec<bool>>>) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let device = FakeDevice {
            commands: commands.clone(),
            fail,
        };
        let capability = TorchCapability {
            device_id: Some("rear-0".into()),
            available: true,
        };
        let controller = TorchController::start(capability, Some(Box::new(device)));
        (controller, commands)
    }

    fn issued(commands: &Arc<Mutex<Vec<bool>>>) -> Vec<bool> {
        commands.lock().unwrap().clone()
    }

    #[test]
    fn repeated_set_mode_issues_one_command_per_change() {
        let (mut controller, commands) = available_controller(false);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::Off);
        controller.set_mode(TorchMode::Off);
        controller.shutdown();
        assert_eq!(issued(&commands), vec![true, false]);
    }

    #[test]
    fn unavailable_capability_issues_no_commands_but_records_mode() {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let device = FakeDevice {
            commands: commands.clone(),
            fail: false,
        };
        let capability = TorchCapability::unavailable();
        let mut controller = TorchController::start(capability, Some(Box::new(device)));
        controller.set_mode(TorchMode::On);
        controller.auto_signal(true);
        controller.auto_signal(false);
        controller.shutdown();
        assert!(issued(&commands).is_empty());
        assert!(!controller.is_available());
        assert_eq!(controller.state().mode, TorchMode::On);
        assert!(!controller.state().hardware_enabled);
    }

    #[test]
    fn auto_signal_ignored_outside_auto_mode() {
        let (mut controller, commands) = available_controller(false);
        controller.set_mode(TorchMode::Off);
        controller.auto_signal(true);
        controller.auto_signal(true);
        controller.shutdown();
        // Only the explicit OFF reaches the hardware.
        assert_eq!(issued(&commands), vec![false]);
    }

    #[test]
    fn duplicate_auto_signals_are_debounced() {
        let (mut controller, commands) = available_controller(false);
        controller.auto_signal(true);
        controller.auto_signal(true);
        controller.shutdown();
        assert_eq!(issued(&commands), vec![true]);
        assert!(controller.state().hardware_enabled);
    }

    #[test]
    fn manual_then_auto_then_signal_issues_two_commands() {
        let (mut controller, commands) = available_controller(false);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::Auto);
        controller.auto_signal(false);
        controller.shutdown();
        assert_eq!(issued(&commands), vec![true, false]);
        assert_eq!(controller.state().mode, TorchMode::Auto);
        assert!(!controller.state().hardware_enabled);
    }

    #[test]
    fn command_failure_keeps_mode_and_still_debounces() {
        let (mut controller, commands) = available_controller(true);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::On);
        controller.set_mode(TorchMode::Off);
        controller.shutdown();
        // Failed enable is not retried; the differing disable still goes out.
        assert_eq!(issued(&commands), vec![true, false]);
        assert_eq!(controller.state().mode, TorchMode::Off);
    }

    #[test]
    fn auto_mode_selection_issues_no_immediate_command() {
        let (mut controller, commands) = available_controller(false);
        controller.set_mode(TorchMode::Auto);
        controller.shutdown();
        assert!(issued(&commands).is_empty());
    }

    #[test]
    fn handle_usable_from_another_thread() {
        let (mut controller, commands) = available_controller(false);
        let handle = controller.handle();
        let worker = std::thread::spawn(move || {
            handle.auto_signal(true);
            handle.auto_signal(true);
        });
        worker.join().unwrap();
        controller.shutdown();
        assert_eq!(issued(&commands), vec![true]);
    }

    struct OpenFailEnumerator;

    impl LightEnumerator for OpenFailEnumerator {
        fn enumerate(&self) -> crate::Result<Vec<LightDeviceInfo>> {
            Ok(vec![LightDeviceInfo {
                id: "rear-0".into(),
                has_emitter: true,
                facing: Facing::Rear,
            }])
        }

        fn open(&self, _id: &str) -> crate::Result<Box<dyn TorchDevice>> {
            Err(TorchError::DeviceNotFound)
        }
    }

    #[test]
    fn open_failure_degrades_to_unavailable() {
        let mut controller = TorchController::discover(&OpenFailEnumerator);
        assert!(!controller.is_available());
        controller.set_mode(TorchMode::On);
        controller.shutdown();
        // Mode is still recorded for UI consistency; hardware stays untouched.
        assert_eq!(controller.state().mode, TorchMode::On);
        assert!(!controller.state().hardware_enabled);
    }

    #[test]
    fn commands_after_stop_are_ignored() {
        let (mut controller, commands) = available_controller(false);
        controller.set_mode(TorchMode::On);
        controller.shutdown();
        controller.set_mode(TorchMode::Off);
        controller.auto_signal(false);
        assert_eq!(issued(&commands), vec![true]);
    }
}
