//! Hardware event dispatch and synthetic edges
//!
//! Gamepad-capable devices report every input through both views. The logical
//! view is authoritative for them: gamepad events raise the wildcards and the
//! bound raw slot, raw axis and hat events are dropped, and raw button events
//! only touch their own slot. Raw-only devices drive the wildcards from the
//! raw events instead.

use super::{GamepadHub, PendingEdge};
use crate::input::gamepad::analog::{normalize_raw, respond, AxisKind};
use crate::input::gamepad::index::{
    logical_axis_slot, logical_button_slot, raw_axis_slot, raw_button_slot, Slot, ANY_AXIS,
    ANY_BUTTON, ANY_INPUT,
};
use crate::input::gamepad::layer::{DeviceLayer, HardwareEvent};
use crate::input::gamepad::registry::Device;
use tracing::trace;

impl<L: DeviceLayer> GamepadHub<L> {
    /// Pop every pending hardware event and route it to its device
    pub(super) fn drain_events(&mut self) {
        while let Some(event) = self.layer.poll_event() {
            match self.registry.by_id_mut(event.which()) {
                Some(device) => dispatch_event(device, event),
                None => trace!("Event for unknown device {} ignored", event.which()),
            }
        }
    }

    /// Apply queued synthetic edges in the order they were requested
    pub(super) fn apply_pending(&mut self) {
        for edge in std::mem::take(&mut self.pending) {
            match self.registry.by_id_mut(edge.id) {
                Some(device) => apply_synthetic(device, edge),
                None => trace!("Synthetic edge for departed device {} dropped", edge.id),
            }
        }
    }
}

fn dispatch_event<H>(device: &mut Device<H>, event: HardwareEvent) {
    trace!("Dispatching {:?}", event);

    match event {
        HardwareEvent::GamepadButton { button, down, .. } => {
            let slot = logical_button_slot(button);
            let mut mirrors = vec![ANY_BUTTON, ANY_INPUT];
            mirrors.extend(device.resolve(slot).map(|r| r.raw));
            device.tracker_mut().apply_mirrored_edge(slot, down, &mirrors);
        },

        HardwareEvent::GamepadAxis { axis, value, .. } => {
            let slot = logical_axis_slot(axis);
            let value = respond(
                normalize_raw(value),
                AxisKind::of_logical(axis),
                device.deadzone(),
                device.threshold(),
            );

            let bound = device.resolve(slot).map(|r| r.raw);
            let tracker = device.tracker_mut();
            if let Some(transition) = tracker.apply_axis_edge(slot, value) {
                let mut mirrors = vec![ANY_AXIS, ANY_INPUT];
                mirrors.extend(bound);
                for mirror in mirrors {
                    tracker.apply_button_edge(mirror, transition.down);
                }
            }
        },

        HardwareEvent::JoystickButton { button, down, .. } => {
            let Some(slot) = raw_button_slot(button) else {
                return;
            };

            if device.is_gamepad() {
                device.tracker_mut().apply_button_edge(slot, down);
            } else {
                device.tracker_mut().apply_mirrored_edge(slot, down, &[ANY_BUTTON, ANY_INPUT]);
            }
        },

        HardwareEvent::JoystickAxis { axis, value, .. } => {
            if device.is_gamepad() {
                return;
            }
            let Some(slot) = raw_axis_slot(axis) else {
                return;
            };

            let value = respond(normalize_raw(value), AxisKind::Stick, device.deadzone(), device.threshold());
            let tracker = device.tracker_mut();
            if let Some(transition) = tracker.apply_axis_edge(slot, value) {
                tracker.apply_button_edge(ANY_AXIS, transition.down);
                tracker.apply_button_edge(ANY_INPUT, transition.down);
            }
        },

        HardwareEvent::JoystickHat { hat, mask, .. } => {
            if device.is_gamepad() {
                return;
            }

            let tracker = device.tracker_mut();
            for transition in tracker.apply_hat_edge(hat, mask) {
                tracker.apply_button_edge(ANY_BUTTON, transition.down);
                tracker.apply_button_edge(ANY_INPUT, transition.down);
            }
        },
    }
}

fn apply_synthetic<H>(device: &mut Device<H>, edge: PendingEdge) {
    let mut mirrors: Vec<Slot> = vec![ANY_INPUT];
    if let Some(resolved) = device.resolve(edge.slot) {
        mirrors.push(resolved.raw);
        mirrors.push(resolved.wildcard);
    }

    trace!("Synthetic edge on {}: {} (down={})", device.id(), edge.slot, edge.down);
    device.tracker_mut().apply_mirrored_edge(edge.slot, edge.down, &mirrors);
}
