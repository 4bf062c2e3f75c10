//! Gamepad hub - owns the device layer and every tracked device
//!
//! The hub is the single entry point for the host application:
//! - `poll_once` runs one poll cycle (reconcile, clear edges, drain events)
//! - every query reads state captured by the last cycle and never mutates it
//! - passthroughs (rumble, LED, mappings) go straight to the device layer
//!
//! Devices are addressed by their dense registry index.

mod dispatch;
mod passthrough;

#[cfg(test)]
mod tests;

use super::analog::{normalize_raw, respond, AxisKind};
use super::error::HubError;
use super::index::{decode_hat_mask, Slot, SlotKind};
use super::layer::{DeviceLayer, HardwareId};
use super::registry::{Device, DeviceRegistry, ResponseDefaults};
use super::tracker::SlotFlags;
use tracing::{debug, error, trace};

/// Host-requested edge waiting for the next poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEdge {
    id: HardwareId,
    slot: Slot,
    down: bool,
}

pub struct GamepadHub<L: DeviceLayer> {
    layer: L,
    registry: DeviceRegistry<L::Handle>,
    pending: Vec<PendingEdge>,
}

impl<L: DeviceLayer> GamepadHub<L> {
    pub fn new(layer: L, defaults: ResponseDefaults) -> Self {
        Self {
            layer,
            registry: DeviceRegistry::new(defaults),
            pending: Vec::new(),
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Run one poll cycle
    ///
    /// # Returns
    /// `true` if a device was attached or detached during this cycle
    ///
    /// # Errors
    /// [`HubError::Enumeration`] if the layer cannot list devices. Nothing is
    /// modified in that case: every device keeps its flags from the previous
    /// cycle and queued synthetic edges stay queued.
    pub fn poll_once(&mut self) -> Result<bool, HubError> {
        self.layer.update();

        let ids = self.layer.connected_ids().map_err(|e| {
            error!("Failed to enumerate gamepads: {}", e);
            HubError::Enumeration(e)
        })?;

        let changed = self.registry.reconcile(&mut self.layer, &ids);

        for device in self.registry.iter_mut() {
            device.tracker_mut().begin_cycle();
        }

        self.drain_events();
        self.apply_pending();

        if changed {
            debug!("Device set changed, {} tracked", self.registry.len());
        }
        Ok(changed)
    }

    /// Close every device handle and forget all tracked devices
    pub fn shutdown(&mut self) {
        self.pending.clear();
        self.registry.close_all(&mut self.layer);
    }

    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    pub fn device(&self, index: usize) -> Result<&Device<L::Handle>, HubError> {
        self.registry.get(index).ok_or(HubError::DeviceOutOfRange {
            index,
            count: self.registry.len(),
        })
    }

    fn device_mut(&mut self, index: usize) -> Result<&mut Device<L::Handle>, HubError> {
        let count = self.registry.len();
        self.registry
            .get_mut(index)
            .ok_or(HubError::DeviceOutOfRange { index, count })
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device<L::Handle>> {
        self.registry.iter()
    }

    /// Whether the device has the standard gamepad view
    pub fn is_gamepad(&self, index: usize) -> Result<bool, HubError> {
        Ok(self.device(index)?.is_gamepad())
    }

    pub fn flags(&self, index: usize, slot: usize) -> Result<SlotFlags, HubError> {
        let slot = to_slot(slot)?;
        Ok(self.device(index)?.tracker().flags(slot))
    }

    /// Input is held as of the last poll cycle
    pub fn level(&self, index: usize, slot: usize) -> Result<bool, HubError> {
        Ok(self.flags(index, slot)?.level)
    }

    /// Input went down during the last poll cycle
    pub fn just_pressed(&self, index: usize, slot: usize) -> Result<bool, HubError> {
        Ok(self.flags(index, slot)?.just_pressed)
    }

    /// Input went up during the last poll cycle
    pub fn just_released(&self, index: usize, slot: usize) -> Result<bool, HubError> {
        Ok(self.flags(index, slot)?.just_released)
    }

    pub fn deadzone(&self, index: usize) -> Result<f64, HubError> {
        Ok(self.device(index)?.deadzone())
    }

    /// Set the stick deadzone (clamped to [0, 1])
    pub fn set_deadzone(&mut self, index: usize, deadzone: f64) -> Result<(), HubError> {
        self.device_mut(index)?.set_deadzone(deadzone);
        Ok(())
    }

    pub fn threshold(&self, index: usize) -> Result<f64, HubError> {
        Ok(self.device(index)?.threshold())
    }

    /// Set the trigger threshold (clamped to [0, 1])
    pub fn set_threshold(&mut self, index: usize, threshold: f64) -> Result<(), HubError> {
        self.device_mut(index)?.set_threshold(threshold);
        Ok(())
    }

    /// Current value of an axis slot after the response curve, in [-1, 1]
    ///
    /// Reads the hardware directly rather than the edge table.
    pub fn axis_value(&self, index: usize, slot: usize) -> Result<f64, HubError> {
        let checked = to_slot(slot)?;
        let device = self.device(index)?;
        let kind = AxisKind::of(checked.kind()).ok_or(HubError::NotAnAxis(slot))?;

        let raw = match checked.kind() {
            SlotKind::RawAxis(axis) => self.layer.joystick_axis(device.handle(), axis),
            SlotKind::LogicalAxis(axis) => {
                if !device.is_gamepad() {
                    return Err(HubError::NotAGamepad(index));
                }
                self.layer.gamepad_axis(device.handle(), axis)
            },
            _ => return Err(HubError::NotAnAxis(slot)),
        };

        Ok(respond(normalize_raw(raw), kind, device.deadzone(), device.threshold()))
    }

    /// Instantaneous hardware level of a slot, bypassing the edge table
    pub fn direct_level(&self, index: usize, slot: usize) -> Result<bool, HubError> {
        let checked = to_slot(slot)?;
        let device = self.device(index)?;
        let handle = device.handle();

        let level = match checked.kind() {
            SlotKind::RawButton(button) => self.layer.joystick_button(handle, button),
            SlotKind::RawAxis(_) => self.axis_value(index, slot)? != 0.0,
            SlotKind::RawHat { hat, direction } => {
                decode_hat_mask(self.layer.joystick_hat(handle, hat)).contains(&direction)
            },
            SlotKind::LogicalButton(button) => {
                if !device.is_gamepad() {
                    return Err(HubError::NotAGamepad(index));
                }
                self.layer.gamepad_button(handle, button)
            },
            SlotKind::LogicalAxis(_) => self.axis_value(index, slot)? != 0.0,
            SlotKind::AnyButton | SlotKind::AnyAxis | SlotKind::AnyInput => {
                device.tracker().level(checked)
            },
        };

        Ok(level)
    }

    /// Raw slot currently bound to a logical slot
    ///
    /// `None` for raw and wildcard slots, raw-only devices, and logical
    /// outputs the device leaves unbound.
    pub fn raw_bound_index(&self, index: usize, slot: usize) -> Result<Option<Slot>, HubError> {
        let checked = to_slot(slot)?;
        let device = self.device(index)?;
        Ok(device.resolve(checked).map(|resolved| resolved.raw))
    }

    /// Queue a press to be applied during the next poll cycle
    pub fn queue_press(&mut self, index: usize, slot: usize) -> Result<(), HubError> {
        self.queue_edge(index, slot, true)
    }

    /// Queue a release to be applied during the next poll cycle
    pub fn queue_release(&mut self, index: usize, slot: usize) -> Result<(), HubError> {
        self.queue_edge(index, slot, false)
    }

    fn queue_edge(&mut self, index: usize, slot: usize, down: bool) -> Result<(), HubError> {
        let checked = to_slot(slot)?;
        if checked.is_wildcard() {
            return Err(HubError::WildcardSlot(slot));
        }

        let id = self.device(index)?.id();
        trace!("Synthetic {} queued on {} slot {}", if down { "press" } else { "release" }, id, checked);
        self.pending.push(PendingEdge { id, slot: checked, down });
        Ok(())
    }

    /// Number of synthetic edges waiting for the next cycle
    pub fn pending_edges(&self) -> usize {
        self.pending.len()
    }
}

impl<L: DeviceLayer> Drop for GamepadHub<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn to_slot(index: usize) -> Result<Slot, HubError> {
    Slot::new(index).ok_or(HubError::SlotOutOfRange(index))
}
