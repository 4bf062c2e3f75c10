//! Tracked devices and their reconciliation against the hardware list
//!
//! The registry is a dense, ordered list. The host addresses devices purely by
//! their position in it, so removing a device shifts every later device down by
//! one while keeping their relative order.

use super::analog::{clamp_unit, DEFAULT_DEADZONE};
use super::binding::{resolve_raw_index, Binding, ResolvedBinding};
use super::index::Slot;
use super::layer::{DeviceInfo, DeviceLayer, HardwareId};
use super::tracker::EventTracker;
use tracing::{debug, info};

/// One tracked controller
#[derive(Debug)]
pub struct Device<H> {
    handle: H,
    id: HardwareId,
    gamepad: bool,
    info: DeviceInfo,
    bindings: Vec<Binding>,
    deadzone: f64,
    threshold: f64,
    tracker: EventTracker,
}

impl<H> Device<H> {
    fn open<L>(layer: &L, handle: H, defaults: ResponseDefaults) -> Self
    where
        L: DeviceLayer<Handle = H>,
    {
        Self {
            id: layer.hardware_id(&handle),
            gamepad: layer.is_gamepad(&handle),
            info: layer.info(&handle),
            bindings: layer.bindings(&handle),
            handle,
            deadzone: defaults.deadzone,
            threshold: defaults.threshold,
            tracker: EventTracker::new(),
        }
    }

    pub fn id(&self) -> HardwareId {
        self.id
    }

    /// Whether the device is recognized as a standard gamepad
    pub fn is_gamepad(&self) -> bool {
        self.gamepad
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn deadzone(&self) -> f64 {
        self.deadzone
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Set the stick deadzone, silently clamped to 0.0..=1.0
    pub fn set_deadzone(&mut self, deadzone: f64) {
        self.deadzone = clamp_unit(deadzone);
    }

    /// Set the trigger threshold, silently clamped to 0.0..=1.0
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = clamp_unit(threshold);
    }

    pub fn tracker(&self) -> &EventTracker {
        &self.tracker
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut EventTracker {
        &mut self.tracker
    }

    /// Raw slot bound to a logical slot under the current binding table
    pub fn resolve(&self, logical: Slot) -> Option<ResolvedBinding> {
        resolve_raw_index(&self.bindings, logical)
    }

    /// Re-read capability, description and bindings after a mapping change
    pub(crate) fn refresh<L>(&mut self, layer: &L)
    where
        L: DeviceLayer<Handle = H>,
    {
        self.gamepad = layer.is_gamepad(&self.handle);
        self.info = layer.info(&self.handle);
        self.bindings = layer.bindings(&self.handle);
    }

    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

/// Response parameters given to newly attached devices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseDefaults {
    pub deadzone: f64,
    pub threshold: f64,
}

impl Default for ResponseDefaults {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            threshold: DEFAULT_DEADZONE,
        }
    }
}

/// Ordered collection of tracked devices
#[derive(Debug)]
pub struct DeviceRegistry<H> {
    devices: Vec<Device<H>>,
    defaults: ResponseDefaults,
}

impl<H> DeviceRegistry<H> {
    pub fn new(defaults: ResponseDefaults) -> Self {
        Self {
            devices: Vec::new(),
            defaults: ResponseDefaults {
                deadzone: clamp_unit(defaults.deadzone),
                threshold: clamp_unit(defaults.threshold),
            },
        }
    }

    /// Bring the registry in line with the hardware device list
    ///
    /// Devices missing from `hardware_ids`, or whose handle reports
    /// disconnected, are closed and removed. Every unknown ID is opened as a
    /// gamepad, falling back to a raw joystick; IDs that cannot be opened
    /// either way are skipped and retried on the next call.
    ///
    /// # Returns
    /// `true` if any device was added or removed
    pub fn reconcile<L>(&mut self, layer: &mut L, hardware_ids: &[HardwareId]) -> bool
    where
        L: DeviceLayer<Handle = H>,
    {
        let mut changed = false;

        let mut index = 0;
        while index < self.devices.len() {
            let device = &self.devices[index];
            if hardware_ids.contains(&device.id) && layer.is_connected(&device.handle) {
                index += 1;
                continue;
            }

            let device = self.devices.remove(index);
            info!("🔌 Gamepad {} disconnected: {} (slot {})", device.id, device.info.name, index);
            layer.close(device.handle);
            changed = true;
        }

        for &id in hardware_ids {
            if self.position_of(id).is_some() {
                continue;
            }

            let handle = match layer.open_gamepad(id) {
                Some(handle) => handle,
                None => match layer.open_joystick(id) {
                    Some(handle) => handle,
                    None => {
                        debug!("Device {} could not be opened, retrying next cycle", id);
                        continue;
                    },
                },
            };

            let device = Device::open(layer, handle, self.defaults);
            info!(
                "✅ {} {} connected: {} (slot {})",
                if device.gamepad { "Gamepad" } else { "Joystick" },
                device.id,
                device.info.name,
                self.devices.len()
            );
            self.devices.push(device);
            changed = true;
        }

        changed
    }

    /// Close every device and empty the registry
    pub fn close_all<L>(&mut self, layer: &mut L)
    where
        L: DeviceLayer<Handle = H>,
    {
        for device in self.devices.drain(..) {
            layer.close(device.handle);
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Device<H>> {
        self.devices.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Device<H>> {
        self.devices.get_mut(index)
    }

    /// Current index of the device with this hardware ID
    pub fn position_of(&self, id: HardwareId) -> Option<usize> {
        self.devices.iter().position(|d| d.id == id)
    }

    pub fn by_id_mut(&mut self, id: HardwareId) -> Option<&mut Device<H>> {
        self.devices.iter_mut().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device<H>> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device<H>> {
        self.devices.iter_mut()
    }
}
