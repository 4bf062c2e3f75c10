//! Device description and output passthroughs

use super::GamepadHub;
use crate::input::gamepad::error::HubError;
use crate::input::gamepad::layer::{DeviceLayer, GamepadKind, HardwareId};
use tracing::{debug, info};

/// Convert a [0, 1] strength to the 16-bit rumble scale
fn rumble_strength(value: f64) -> u16 {
    (value * 65535.0).clamp(0.0, 65535.0) as u16
}

/// Split a host colour integer (blue in the high byte) into RGB
pub fn split_bgr(color: u32) -> (u8, u8, u8) {
    let red = (color & 0xFF) as u8;
    let green = ((color >> 8) & 0xFF) as u8;
    let blue = ((color >> 16) & 0xFF) as u8;
    (red, green, blue)
}

impl<L: DeviceLayer> GamepadHub<L> {
    pub fn description(&self, index: usize) -> Result<&str, HubError> {
        Ok(&self.device(index)?.info().name)
    }

    /// Gamepad family, always `Unknown` for raw-only devices
    pub fn kind(&self, index: usize) -> Result<GamepadKind, HubError> {
        let device = self.device(index)?;
        if !device.is_gamepad() {
            return Ok(GamepadKind::Unknown);
        }
        Ok(device.info().kind)
    }

    /// GUID as 32 lowercase hex digits, or `"none"` when the device reports none
    pub fn guid_string(&self, index: usize) -> Result<String, HubError> {
        let guid = self.device(index)?.info().guid;
        if guid.iter().all(|b| *b == 0) {
            return Ok("none".to_string());
        }
        Ok(hex::encode(guid))
    }

    pub fn stable_id(&self, index: usize) -> Result<HardwareId, HubError> {
        Ok(self.device(index)?.id())
    }

    pub fn button_count(&self, index: usize) -> Result<usize, HubError> {
        Ok(self.device(index)?.info().button_count)
    }

    pub fn axis_count(&self, index: usize) -> Result<usize, HubError> {
        Ok(self.device(index)?.info().axis_count)
    }

    pub fn hat_count(&self, index: usize) -> Result<usize, HubError> {
        Ok(self.device(index)?.info().hat_count)
    }

    /// Mapping string applied to the device, `None` for raw-only devices
    pub fn mapping(&self, index: usize) -> Result<Option<String>, HubError> {
        let device = self.device(index)?;
        if !device.is_gamepad() {
            return Ok(None);
        }
        Ok(self.layer.mapping(device.handle()))
    }

    /// Apply a mapping string
    ///
    /// A raw-only device that accepts the mapping gains the gamepad view; its
    /// binding table and description are re-read either way.
    pub fn apply_mapping(&mut self, index: usize, mapping: &str) -> Result<(), HubError> {
        let count = self.registry.len();
        let device = self
            .registry
            .get_mut(index)
            .ok_or(HubError::DeviceOutOfRange { index, count })?;

        let was_gamepad = device.is_gamepad();
        self.layer.set_mapping(device.handle_mut(), Some(mapping))?;
        device.refresh(&self.layer);

        if !was_gamepad && device.is_gamepad() {
            info!("🎮 Device {} upgraded to gamepad by mapping", device.id());
        } else {
            debug!("Mapping applied to device {}", device.id());
        }
        Ok(())
    }

    /// Drop any mapping applied to the device
    pub fn remove_mapping(&mut self, index: usize) -> Result<(), HubError> {
        let count = self.registry.len();
        let device = self
            .registry
            .get_mut(index)
            .ok_or(HubError::DeviceOutOfRange { index, count })?;

        self.layer.set_mapping(device.handle_mut(), None)?;
        device.refresh(&self.layer);
        debug!("Mapping removed from device {}", device.id());
        Ok(())
    }

    /// Start a rumble effect
    ///
    /// `low` and `high` are motor strengths in [0, 1], `seconds` the duration.
    pub fn rumble(&mut self, index: usize, low: f64, high: f64, seconds: f64) -> Result<(), HubError> {
        let duration_ms = (seconds * 1000.0).max(0.0) as u32;
        let device = self.registry.get(index).ok_or(HubError::DeviceOutOfRange {
            index,
            count: self.registry.len(),
        })?;

        self.layer.rumble(
            device.handle(),
            rumble_strength(low),
            rumble_strength(high),
            duration_ms,
        )?;
        Ok(())
    }

    /// Set the LED colour from a host colour integer (`0xBBGGRR`)
    pub fn set_color(&mut self, index: usize, color: u32) -> Result<(), HubError> {
        let (red, green, blue) = split_bgr(color);
        let device = self.registry.get(index).ok_or(HubError::DeviceOutOfRange {
            index,
            count: self.registry.len(),
        })?;

        self.layer.set_led(device.handle(), red, green, blue)?;
        Ok(())
    }
}
