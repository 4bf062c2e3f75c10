//! Boundary with the native device API
//!
//! The tracking engine never talks to a gamepad library directly. Everything it
//! needs from the platform goes through [`DeviceLayer`]: enumerating devices,
//! opening and closing them, instantaneous reads, binding tables, the event
//! queue, and the rumble/LED/mapping passthroughs.

use super::binding::Binding;
use super::index::{LogicalAxis, LogicalButton};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable hardware identifier of a connected device
///
/// Stays the same for as long as the device is plugged in, unlike the dense
/// registry index the host sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareId(pub u32);

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Controller family, numbered like SDL's gamepad types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadKind {
    #[default]
    Unknown = 0,
    Standard,
    Xbox360,
    XboxOne,
    Ps3,
    Ps4,
    Ps5,
    SwitchPro,
    SwitchJoyconLeft,
    SwitchJoyconRight,
    SwitchJoyconPair,
}

impl GamepadKind {
    /// Numeric code exposed to the host
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Static description captured when a device is opened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    #[serde(default)]
    pub guid: [u8; 16],
    #[serde(default)]
    pub kind: GamepadKind,
    #[serde(default)]
    pub button_count: usize,
    #[serde(default)]
    pub axis_count: usize,
    #[serde(default)]
    pub hat_count: usize,
}

/// One pending hardware event
///
/// Gamepad-capable devices report every input twice: once through the raw
/// joystick view and once through the logical gamepad view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HardwareEvent {
    JoystickButton { which: HardwareId, button: usize, down: bool },
    JoystickAxis { which: HardwareId, axis: usize, value: i16 },
    JoystickHat { which: HardwareId, hat: usize, mask: u8 },
    GamepadButton { which: HardwareId, button: LogicalButton, down: bool },
    GamepadAxis { which: HardwareId, axis: LogicalAxis, value: i16 },
}

impl HardwareEvent {
    /// Device the event came from
    pub fn which(&self) -> HardwareId {
        match *self {
            Self::JoystickButton { which, .. }
            | Self::JoystickAxis { which, .. }
            | Self::JoystickHat { which, .. }
            | Self::GamepadButton { which, .. }
            | Self::GamepadAxis { which, .. } => which,
        }
    }
}

/// Failures reported by a device layer
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("failed to enumerate devices: {0}")]
    Enumeration(String),

    #[error("operation not supported by this device layer: {0}")]
    Unsupported(&'static str),

    #[error("device {0} is no longer connected")]
    NotConnected(HardwareId),

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("device backend error: {0}")]
    Backend(String),
}

/// Native gamepad/joystick API as seen by the tracking engine
///
/// A handle is owned by exactly one tracked device and goes back to the layer
/// through [`DeviceLayer::close`] when that device is dropped.
pub trait DeviceLayer {
    type Handle;

    /// Let the native layer refresh its internal state before a poll cycle
    fn update(&mut self);

    /// Identifiers of every currently connected device, in a stable order
    fn connected_ids(&mut self) -> Result<Vec<HardwareId>, LayerError>;

    /// Open with the standard gamepad view; `None` if the device has no mapping
    fn open_gamepad(&mut self, id: HardwareId) -> Option<Self::Handle>;

    /// Open with the raw joystick view only
    fn open_joystick(&mut self, id: HardwareId) -> Option<Self::Handle>;

    fn close(&mut self, handle: Self::Handle);

    fn is_connected(&self, handle: &Self::Handle) -> bool;

    fn hardware_id(&self, handle: &Self::Handle) -> HardwareId;

    /// Whether the handle currently has the gamepad view
    fn is_gamepad(&self, handle: &Self::Handle) -> bool;

    fn info(&self, handle: &Self::Handle) -> DeviceInfo;

    fn joystick_button(&self, handle: &Self::Handle, button: usize) -> bool;

    fn joystick_axis(&self, handle: &Self::Handle, axis: usize) -> i16;

    fn joystick_hat(&self, handle: &Self::Handle, hat: usize) -> u8;

    fn gamepad_button(&self, handle: &Self::Handle, button: LogicalButton) -> bool;

    fn gamepad_axis(&self, handle: &Self::Handle, axis: LogicalAxis) -> i16;

    /// Binding table of the gamepad view, empty for raw joysticks
    fn bindings(&self, handle: &Self::Handle) -> Vec<Binding>;

    /// Pop the next queued event without blocking
    fn poll_event(&mut self) -> Option<HardwareEvent>;

    fn rumble(
        &mut self,
        handle: &Self::Handle,
        low: u16,
        high: u16,
        duration_ms: u32,
    ) -> Result<(), LayerError>;

    fn set_led(&mut self, handle: &Self::Handle, red: u8, green: u8, blue: u8)
        -> Result<(), LayerError>;

    /// Mapping string currently applied to the device, if any
    fn mapping(&self, handle: &Self::Handle) -> Option<String>;

    /// Apply (`Some`) or remove (`None`) a mapping
    ///
    /// Applying a mapping to a raw joystick may give the handle the gamepad
    /// view; callers re-read [`DeviceLayer::is_gamepad`] and
    /// [`DeviceLayer::bindings`] afterwards.
    fn set_mapping(&mut self, handle: &mut Self::Handle, mapping: Option<&str>)
        -> Result<(), LayerError>;
}
