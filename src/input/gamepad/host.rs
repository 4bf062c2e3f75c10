//! Numeric host bridge
//!
//! Scripting hosts only pass doubles and strings across their boundary. The
//! bridge wraps a [`GamepadHub`] and speaks that convention: booleans come back
//! as `0.0`/`1.0`, indices arrive as doubles and are truncated, and every error
//! turns into a fixed neutral value instead of propagating.

use super::error::HubError;
use super::hub::GamepadHub;
use super::layer::DeviceLayer;
use tracing::{debug, error, warn};

/// Returned by `description` for an invalid device index
pub const NO_GAMEPAD: &str = "no gamepad";

/// Returned by `guid` and `mapping` for an invalid device index
pub const INDEX_OUT_OF_RANGE: &str = "device index out of range";

/// Returned by `mapping` when the device has no mapping
pub const NO_MAPPING: &str = "no mapping";

/// Truncate a host index; negative, NaN and infinite values are invalid
fn to_index(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.trunc() as usize)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// `1.0` on success, `0.0` on any error
fn outcome(result: Result<(), HubError>) -> f64 {
    match result {
        Ok(()) => 1.0,
        Err(e) => {
            debug!("Host call failed: {}", e);
            0.0
        },
    }
}

pub struct HostBridge<L: DeviceLayer> {
    hub: GamepadHub<L>,
}

impl<L: DeviceLayer> HostBridge<L> {
    pub fn new(hub: GamepadHub<L>) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &GamepadHub<L> {
        &self.hub
    }

    pub fn hub_mut(&mut self) -> &mut GamepadHub<L> {
        &mut self.hub
    }

    /// Run one poll cycle: `1.0` changed, `0.0` unchanged, `-1.0` enumeration failure
    pub fn update(&mut self) -> f64 {
        match self.hub.poll_once() {
            Ok(changed) => flag(changed),
            Err(e) => {
                error!("Gamepad update failed: {}", e);
                -1.0
            },
        }
    }

    pub fn device_count(&self) -> f64 {
        self.hub.device_count() as f64
    }

    fn with_device<T>(&self, id: f64, fallback: T, read: impl FnOnce(usize) -> Result<T, HubError>) -> T {
        to_index(id).and_then(|index| read(index).ok()).unwrap_or(fallback)
    }

    fn with_slot<T>(
        &self,
        id: f64,
        slot: f64,
        fallback: T,
        read: impl FnOnce(usize, usize) -> Result<T, HubError>,
    ) -> T {
        match (to_index(id), to_index(slot)) {
            (Some(index), Some(slot)) => read(index, slot).unwrap_or(fallback),
            _ => fallback,
        }
    }

    pub fn is_supported(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.is_gamepad(i).map(flag))
    }

    pub fn description(&self, id: f64) -> String {
        self.with_device(id, NO_GAMEPAD.to_string(), |i| {
            self.hub.description(i).map(str::to_string)
        })
    }

    pub fn kind(&self, id: f64) -> f64 {
        self.with_device(id, -1.0, |i| self.hub.kind(i).map(|k| k.code() as f64))
    }

    pub fn guid(&self, id: f64) -> String {
        self.with_device(id, INDEX_OUT_OF_RANGE.to_string(), |i| self.hub.guid_string(i))
    }

    pub fn stable_id(&self, id: f64) -> f64 {
        self.with_device(id, -1.0, |i| self.hub.stable_id(i).map(|h| h.0 as f64))
    }

    pub fn deadzone(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.deadzone(i))
    }

    pub fn set_deadzone(&mut self, id: f64, deadzone: f64) -> f64 {
        match to_index(id) {
            Some(index) => outcome(self.hub.set_deadzone(index, deadzone)),
            None => 0.0,
        }
    }

    pub fn threshold(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.threshold(i))
    }

    pub fn set_threshold(&mut self, id: f64, threshold: f64) -> f64 {
        match to_index(id) {
            Some(index) => outcome(self.hub.set_threshold(index, threshold)),
            None => 0.0,
        }
    }

    pub fn axis_value(&self, id: f64, axis: f64) -> f64 {
        self.with_slot(id, axis, 0.0, |i, s| self.hub.axis_value(i, s))
    }

    pub fn check_direct(&self, id: f64, button: f64) -> f64 {
        self.with_slot(id, button, 0.0, |i, s| self.hub.direct_level(i, s).map(flag))
    }

    pub fn check(&self, id: f64, button: f64) -> f64 {
        self.with_slot(id, button, 0.0, |i, s| self.hub.level(i, s).map(flag))
    }

    pub fn check_pressed(&self, id: f64, button: f64) -> f64 {
        self.with_slot(id, button, 0.0, |i, s| self.hub.just_pressed(i, s).map(flag))
    }

    pub fn check_released(&self, id: f64, button: f64) -> f64 {
        self.with_slot(id, button, 0.0, |i, s| self.hub.just_released(i, s).map(flag))
    }

    /// Raw slot bound to a logical slot, `-1.0` when there is none
    pub fn raw_bound_index(&self, id: f64, button: f64) -> f64 {
        self.with_slot(id, button, -1.0, |i, s| {
            self.hub
                .raw_bound_index(i, s)
                .map(|bound| bound.map_or(-1.0, |slot| slot.index() as f64))
        })
    }

    pub fn press(&mut self, id: f64, button: f64) -> f64 {
        match (to_index(id), to_index(button)) {
            (Some(index), Some(slot)) => outcome(self.hub.queue_press(index, slot)),
            _ => 0.0,
        }
    }

    pub fn release(&mut self, id: f64, button: f64) -> f64 {
        match (to_index(id), to_index(button)) {
            (Some(index), Some(slot)) => outcome(self.hub.queue_release(index, slot)),
            _ => 0.0,
        }
    }

    pub fn set_vibration(&mut self, id: f64, low: f64, high: f64, seconds: f64) -> f64 {
        let Some(index) = to_index(id) else {
            return 0.0;
        };
        match self.hub.rumble(index, low, high, seconds) {
            Ok(()) => 1.0,
            Err(e) => {
                warn!("Rumble on device {} failed: {}", index, e);
                0.0
            },
        }
    }

    /// Set the LED from a host colour (`0xBBGGRR`)
    pub fn set_color(&mut self, id: f64, color: f64) -> f64 {
        let Some(index) = to_index(id) else {
            return 0.0;
        };
        let color = if color.is_finite() { color as i64 as u32 } else { 0 };
        match self.hub.set_color(index, color) {
            Ok(()) => 1.0,
            Err(e) => {
                warn!("LED update on device {} failed: {}", index, e);
                0.0
            },
        }
    }

    pub fn axis_count(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.axis_count(i).map(|n| n as f64))
    }

    pub fn button_count(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.button_count(i).map(|n| n as f64))
    }

    pub fn hat_count(&self, id: f64) -> f64 {
        self.with_device(id, 0.0, |i| self.hub.hat_count(i).map(|n| n as f64))
    }

    pub fn mapping(&self, id: f64) -> String {
        let Some(index) = to_index(id) else {
            return INDEX_OUT_OF_RANGE.to_string();
        };
        match self.hub.mapping(index) {
            Ok(Some(mapping)) => mapping,
            Ok(None) => NO_MAPPING.to_string(),
            Err(_) => INDEX_OUT_OF_RANGE.to_string(),
        }
    }

    pub fn test_mapping(&mut self, id: f64, mapping: &str) -> f64 {
        match to_index(id) {
            Some(index) => outcome(self.hub.apply_mapping(index, mapping)),
            None => 0.0,
        }
    }

    pub fn remove_mapping(&mut self, id: f64) -> f64 {
        match to_index(id) {
            Some(index) => outcome(self.hub.remove_mapping(index)),
            None => 0.0,
        }
    }
}
