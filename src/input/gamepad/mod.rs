//! Per-frame gamepad and joystick tracking
//!
//! A [`GamepadHub`] owns a [`DeviceLayer`] and keeps one flat table of input
//! slots per connected device. Each call to [`GamepadHub::poll_once`] picks up
//! hot-plugged devices, clears the previous frame's edges and replays the
//! hardware events that arrived since.

pub mod analog;
pub mod binding;
pub mod diagnostics;
pub mod error;
#[cfg(feature = "gilrs")]
pub mod gilrs_layer;
pub mod host;
pub mod hub;
pub mod index;
pub mod layer;
pub mod registry;
pub mod replay;
pub mod tracker;
pub mod virtual_layer;

pub use diagnostics::{describe_devices, FrameReport};
pub use error::HubError;
#[cfg(feature = "gilrs")]
pub use gilrs_layer::GilrsLayer;
pub use host::HostBridge;
pub use hub::GamepadHub;
pub use layer::{DeviceLayer, HardwareEvent, HardwareId, LayerError};
pub use registry::ResponseDefaults;
pub use replay::ReplayScript;
pub use virtual_layer::{VirtualDevice, VirtualLayer};
