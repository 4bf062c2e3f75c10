//! In-memory device layer
//!
//! Backs the test suite and the replay mode of the binary. Devices are attached
//! and detached by hand, events are queued with [`VirtualLayer::push_event`],
//! and every passthrough call is recorded on the device so it can be inspected.

use super::binding::{Binding, BindingInput, BindingOutput, Mapping};
use super::index::{hat_mask, LogicalAxis, LogicalButton};
use super::layer::{DeviceInfo, DeviceLayer, GamepadKind, HardwareEvent, HardwareId, LayerError};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Simulated controller
#[derive(Debug, Clone, Default)]
pub struct VirtualDevice {
    pub info: DeviceInfo,
    pub mapping: Option<Mapping>,
    pub connected: bool,
    buttons: HashMap<usize, bool>,
    axes: HashMap<usize, i16>,
    hats: HashMap<usize, u8>,
    pad_buttons: HashMap<LogicalButton, bool>,
    pad_axes: HashMap<LogicalAxis, i16>,
    /// Last rumble request as (low, high, duration_ms)
    pub rumble: Option<(u16, u16, u32)>,
    /// Last LED colour as (red, green, blue)
    pub led: Option<(u8, u8, u8)>,
}

impl VirtualDevice {
    /// Raw-only device with 12 buttons, 4 axes and one hat
    pub fn joystick(name: &str) -> Self {
        Self {
            info: DeviceInfo {
                name: name.to_string(),
                guid: [0; 16],
                kind: GamepadKind::Unknown,
                button_count: 12,
                axis_count: 4,
                hat_count: 1,
            },
            connected: true,
            ..Self::default()
        }
    }

    /// Gamepad-capable device wired the way common XInput pads report
    pub fn standard_gamepad(name: &str) -> Self {
        let guid = [
            0x03, 0x00, 0x00, 0x00, 0x5e, 0x04, 0x00, 0x00, 0x8e, 0x02, 0x00, 0x00, 0x14, 0x01,
            0x00, 0x00,
        ];

        Self {
            info: DeviceInfo {
                name: name.to_string(),
                guid,
                kind: GamepadKind::Xbox360,
                button_count: 11,
                axis_count: 6,
                hat_count: 1,
            },
            mapping: Some(Mapping {
                guid,
                name: name.to_string(),
                bindings: standard_bindings(),
            }),
            connected: true,
            ..Self::default()
        }
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn bindings(&self) -> Vec<Binding> {
        self.mapping.as_ref().map(|m| m.bindings.clone()).unwrap_or_default()
    }

    fn record(&mut self, event: &HardwareEvent) {
        match *event {
            HardwareEvent::JoystickButton { button, down, .. } => {
                self.buttons.insert(button, down);
            },
            HardwareEvent::JoystickAxis { axis, value, .. } => {
                self.axes.insert(axis, value);
            },
            HardwareEvent::JoystickHat { hat, mask, .. } => {
                self.hats.insert(hat, mask);
            },
            HardwareEvent::GamepadButton { button, down, .. } => {
                self.pad_buttons.insert(button, down);
            },
            HardwareEvent::GamepadAxis { axis, value, .. } => {
                self.pad_axes.insert(axis, value);
            },
        }
    }
}

/// Binding table of [`VirtualDevice::standard_gamepad`]
pub fn standard_bindings() -> Vec<Binding> {
    use BindingInput::{Axis, Button, Hat};

    let buttons = [
        (LogicalButton::South, Button(0)),
        (LogicalButton::East, Button(1)),
        (LogicalButton::West, Button(2)),
        (LogicalButton::North, Button(3)),
        (LogicalButton::LeftShoulder, Button(4)),
        (LogicalButton::RightShoulder, Button(5)),
        (LogicalButton::Back, Button(6)),
        (LogicalButton::Start, Button(7)),
        (LogicalButton::Guide, Button(8)),
        (LogicalButton::LeftStick, Button(9)),
        (LogicalButton::RightStick, Button(10)),
        (LogicalButton::DpadUp, Hat { hat: 0, mask: hat_mask::UP }),
        (LogicalButton::DpadDown, Hat { hat: 0, mask: hat_mask::DOWN }),
        (LogicalButton::DpadLeft, Hat { hat: 0, mask: hat_mask::LEFT }),
        (LogicalButton::DpadRight, Hat { hat: 0, mask: hat_mask::RIGHT }),
    ];
    let axes = [
        (LogicalAxis::LeftX, Axis(0)),
        (LogicalAxis::LeftY, Axis(1)),
        (LogicalAxis::LeftTrigger, Axis(2)),
        (LogicalAxis::RightX, Axis(3)),
        (LogicalAxis::RightY, Axis(4)),
        (LogicalAxis::RightTrigger, Axis(5)),
    ];

    buttons
        .into_iter()
        .map(|(output, input)| Binding { input, output: BindingOutput::Button(output) })
        .chain(
            axes.into_iter()
                .map(|(output, input)| Binding { input, output: BindingOutput::Axis(output) }),
        )
        .collect()
}

/// Handle given out by [`VirtualLayer`]
#[derive(Debug, PartialEq, Eq)]
pub struct VirtualHandle {
    id: HardwareId,
    gamepad: bool,
}

/// [`DeviceLayer`] whose hardware is a list of [`VirtualDevice`]s
#[derive(Debug, Default)]
pub struct VirtualLayer {
    devices: Vec<(HardwareId, VirtualDevice)>,
    events: VecDeque<HardwareEvent>,
    enumeration_failure: bool,
    open_failures: HashSet<HardwareId>,
    open_handles: HashMap<HardwareId, usize>,
    updates: usize,
}

impl VirtualLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a device in (replaces any device already using `id`)
    pub fn attach(&mut self, id: HardwareId, device: VirtualDevice) {
        self.detach(id);
        debug!("Virtual device {} attached: {}", id, device.info.name);
        self.devices.push((id, device));
    }

    /// Unplug a device; its queued events stay in the queue
    pub fn detach(&mut self, id: HardwareId) -> Option<VirtualDevice> {
        let position = self.devices.iter().position(|(d, _)| *d == id)?;
        debug!("Virtual device {} detached", id);
        Some(self.devices.remove(position).1)
    }

    pub fn device(&self, id: HardwareId) -> Option<&VirtualDevice> {
        self.devices.iter().find(|(d, _)| *d == id).map(|(_, device)| device)
    }

    fn device_mut(&mut self, id: HardwareId) -> Option<&mut VirtualDevice> {
        self.devices.iter_mut().find(|(d, _)| *d == id).map(|(_, device)| device)
    }

    /// Queue an event and update the instantaneous state it describes
    pub fn push_event(&mut self, event: HardwareEvent) {
        if let Some(device) = self.device_mut(event.which()) {
            device.record(&event);
        }
        trace!("Virtual event queued: {:?}", event);
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Make the next enumerations fail (or succeed again)
    pub fn set_enumeration_failure(&mut self, fail: bool) {
        self.enumeration_failure = fail;
    }

    /// Make opening `id` fail both as gamepad and as joystick
    pub fn set_open_failure(&mut self, id: HardwareId, fail: bool) {
        if fail {
            self.open_failures.insert(id);
        } else {
            self.open_failures.remove(&id);
        }
    }

    /// Flag a device as disconnected without removing it from enumeration
    pub fn set_connected(&mut self, id: HardwareId, connected: bool) {
        if let Some(device) = self.device_mut(id) {
            device.connected = connected;
        }
    }

    /// Number of handles currently open on `id`
    pub fn open_handle_count(&self, id: HardwareId) -> usize {
        self.open_handles.get(&id).copied().unwrap_or(0)
    }

    /// Number of times [`DeviceLayer::update`] ran
    pub fn update_count(&self) -> usize {
        self.updates
    }

    fn open(&mut self, id: HardwareId, gamepad: bool) -> Option<VirtualHandle> {
        if self.open_failures.contains(&id) {
            return None;
        }

        let device = self.device(id).filter(|d| d.connected)?;
        if gamepad && device.mapping.is_none() {
            return None;
        }

        *self.open_handles.entry(id).or_insert(0) += 1;
        Some(VirtualHandle { id, gamepad })
    }
}

impl DeviceLayer for VirtualLayer {
    type Handle = VirtualHandle;

    fn update(&mut self) {
        self.updates += 1;
    }

    fn connected_ids(&mut self) -> Result<Vec<HardwareId>, LayerError> {
        if self.enumeration_failure {
            return Err(LayerError::Enumeration("virtual enumeration failure".to_string()));
        }

        Ok(self.devices.iter().map(|(id, _)| *id).collect())
    }

    fn open_gamepad(&mut self, id: HardwareId) -> Option<VirtualHandle> {
        self.open(id, true)
    }

    fn open_joystick(&mut self, id: HardwareId) -> Option<VirtualHandle> {
        self.open(id, false)
    }

    fn close(&mut self, handle: VirtualHandle) {
        if let Some(count) = self.open_handles.get_mut(&handle.id) {
            *count = count.saturating_sub(1);
        }
    }

    fn is_connected(&self, handle: &VirtualHandle) -> bool {
        self.device(handle.id).is_some_and(|d| d.connected)
    }

    fn hardware_id(&self, handle: &VirtualHandle) -> HardwareId {
        handle.id
    }

    fn is_gamepad(&self, handle: &VirtualHandle) -> bool {
        handle.gamepad
    }

    fn info(&self, handle: &VirtualHandle) -> DeviceInfo {
        let Some(device) = self.device(handle.id) else {
            return DeviceInfo::default();
        };

        let mut info = device.info.clone();
        if !handle.gamepad {
            info.kind = GamepadKind::Unknown;
        } else if info.kind == GamepadKind::Unknown {
            info.kind = GamepadKind::Standard;
        }
        info
    }

    fn joystick_button(&self, handle: &VirtualHandle, button: usize) -> bool {
        self.device(handle.id)
            .and_then(|d| d.buttons.get(&button).copied())
            .unwrap_or(false)
    }

    fn joystick_axis(&self, handle: &VirtualHandle, axis: usize) -> i16 {
        self.device(handle.id).and_then(|d| d.axes.get(&axis).copied()).unwrap_or(0)
    }

    fn joystick_hat(&self, handle: &VirtualHandle, hat: usize) -> u8 {
        self.device(handle.id)
            .and_then(|d| d.hats.get(&hat).copied())
            .unwrap_or(hat_mask::CENTERED)
    }

    fn gamepad_button(&self, handle: &VirtualHandle, button: LogicalButton) -> bool {
        handle.gamepad
            && self
                .device(handle.id)
                .and_then(|d| d.pad_buttons.get(&button).copied())
                .unwrap_or(false)
    }

    fn gamepad_axis(&self, handle: &VirtualHandle, axis: LogicalAxis) -> i16 {
        if !handle.gamepad {
            return 0;
        }
        self.device(handle.id).and_then(|d| d.pad_axes.get(&axis).copied()).unwrap_or(0)
    }

    fn bindings(&self, handle: &VirtualHandle) -> Vec<Binding> {
        if !handle.gamepad {
            return Vec::new();
        }
        self.device(handle.id).map(VirtualDevice::bindings).unwrap_or_default()
    }

    fn poll_event(&mut self) -> Option<HardwareEvent> {
        self.events.pop_front()
    }

    fn rumble(
        &mut self,
        handle: &VirtualHandle,
        low: u16,
        high: u16,
        duration_ms: u32,
    ) -> Result<(), LayerError> {
        let device = self.device_mut(handle.id).ok_or(LayerError::NotConnected(handle.id))?;
        device.rumble = Some((low, high, duration_ms));
        Ok(())
    }

    fn set_led(
        &mut self,
        handle: &VirtualHandle,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), LayerError> {
        let device = self.device_mut(handle.id).ok_or(LayerError::NotConnected(handle.id))?;
        device.led = Some((red, green, blue));
        Ok(())
    }

    fn mapping(&self, handle: &VirtualHandle) -> Option<String> {
        if !handle.gamepad {
            return None;
        }
        self.device(handle.id)?.mapping.as_ref().map(Mapping::to_string)
    }

    fn set_mapping(
        &mut self,
        handle: &mut VirtualHandle,
        mapping: Option<&str>,
    ) -> Result<(), LayerError> {
        let id = handle.id;
        let parsed = mapping
            .map(Mapping::parse)
            .transpose()
            .map_err(|e| LayerError::InvalidMapping(e.to_string()))?;

        let device = self.device_mut(id).ok_or(LayerError::NotConnected(id))?;
        device.mapping = parsed;
        if device.mapping.is_some() {
            handle.gamepad = true;
        }
        Ok(())
    }
}
