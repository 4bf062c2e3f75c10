//! Frame reports and device summaries for troubleshooting
//!
//! Used by the CLI to show what each poll cycle did, either as coloured text or
//! as one JSON object per frame.

use super::hub::GamepadHub;
use super::index::{slot_name, Slot};
use super::layer::{DeviceLayer, GamepadKind, HardwareId};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::info;

/// Edges seen on one device during a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceFrame {
    pub index: usize,
    pub id: HardwareId,
    pub pressed: Vec<String>,
    pub released: Vec<String>,
    /// Number of slots currently held
    pub held: usize,
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    /// Device set changed during this cycle
    pub changed: bool,
    pub devices: Vec<DeviceFrame>,
}

fn names(slots: Vec<Slot>) -> Vec<String> {
    slots.into_iter().map(slot_name).collect()
}

impl FrameReport {
    /// Snapshot the edge flags every tracked device holds right now
    pub fn capture<L: DeviceLayer>(frame: u64, changed: bool, hub: &GamepadHub<L>) -> Self {
        let devices = hub
            .devices()
            .enumerate()
            .map(|(index, device)| {
                let tracker = device.tracker();
                DeviceFrame {
                    index,
                    id: device.id(),
                    pressed: names(tracker.slots_where(|f| f.just_pressed)),
                    released: names(tracker.slots_where(|f| f.just_released)),
                    held: tracker.slots_where(|f| f.level).len(),
                }
            })
            .collect();

        Self { frame, changed, devices }
    }

    /// Nothing happened: no hot-plug and no edges
    pub fn is_quiet(&self) -> bool {
        !self.changed
            && self
                .devices
                .iter()
                .all(|d| d.pressed.is_empty() && d.released.is_empty())
    }

    /// Human-readable rendering, one line per device with edges
    pub fn render(&self) -> String {
        let mut out = format!("{}", format!("frame {}", self.frame).bold());
        if self.changed {
            let _ = write!(out, " {}", "devices changed".yellow());
        }

        for device in &self.devices {
            if device.pressed.is_empty() && device.released.is_empty() {
                continue;
            }
            let _ = write!(out, "\n  #{} (id {})", device.index, device.id);
            for name in &device.pressed {
                let _ = write!(out, " {}", format!("+{}", name).green());
            }
            for name in &device.released {
                let _ = write!(out, " {}", format!("-{}", name).red());
            }
            let _ = write!(out, " [{} held]", device.held);
        }
        out
    }
}

/// Static facts about one tracked device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub index: usize,
    pub id: HardwareId,
    pub name: String,
    pub gamepad: bool,
    pub kind: GamepadKind,
    pub guid: String,
    pub buttons: usize,
    pub axes: usize,
    pub hats: usize,
    pub bindings: usize,
    pub deadzone: f64,
    pub threshold: f64,
}

/// Summarize every tracked device and log the result
pub fn describe_devices<L: DeviceLayer>(hub: &GamepadHub<L>) -> Vec<DeviceSummary> {
    let summaries: Vec<DeviceSummary> = hub
        .devices()
        .enumerate()
        .map(|(index, device)| {
            let info = device.info();
            DeviceSummary {
                index,
                id: device.id(),
                name: info.name.clone(),
                gamepad: device.is_gamepad(),
                kind: if device.is_gamepad() { info.kind } else { GamepadKind::Unknown },
                guid: hub.guid_string(index).unwrap_or_default(),
                buttons: info.button_count,
                axes: info.axis_count,
                hats: info.hat_count,
                bindings: device.bindings().len(),
                deadzone: device.deadzone(),
                threshold: device.threshold(),
            }
        })
        .collect();

    if summaries.is_empty() {
        info!("⚠️  No gamepads detected");
        return summaries;
    }

    info!("✅ Found {} device(s):", summaries.len());
    for s in &summaries {
        info!("📋 #{} id={} \"{}\"", s.index, s.id, s.name);
        info!("   Gamepad view: {} ({:?})", s.gamepad, s.kind);
        info!("   GUID: {}", s.guid);
        info!("   Buttons: {}  Axes: {}  Hats: {}  Bindings: {}", s.buttons, s.axes, s.hats, s.bindings);
        info!("   Deadzone: {:.2}  Threshold: {:.2}", s.deadzone, s.threshold);
    }
    summaries
}
