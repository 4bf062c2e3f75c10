//! Scripted sessions for the virtual device layer
//!
//! A replay script is a YAML list of frames. Each frame is fed to the
//! [`VirtualLayer`] before one poll cycle:
//!
//! ```yaml
//! frames:
//!   - attach:
//!       - { id: 1, name: "Pad", gamepad: true }
//!   - events:
//!       - { type: gamepad_button, which: 1, button: south, down: true }
//!   - synthetic:
//!       - { device: 0, slot: 100, down: false }
//!   - detach: [1]
//! ```

use super::binding::{Binding, Mapping};
use super::layer::{GamepadKind, HardwareEvent, HardwareId};
use super::virtual_layer::{VirtualDevice, VirtualLayer};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Whole scripted session
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub frames: Vec<ReplayFrame>,
}

/// Everything that happens before one poll cycle
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplayFrame {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attach: Vec<AttachSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detach: Vec<HardwareId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<HardwareEvent>,
    /// Host-side presses/releases, applied through the hub
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synthetic: Vec<SyntheticEdge>,
}

/// Device plugged in by a frame
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttachSpec {
    pub id: HardwareId,
    pub name: String,
    /// Give the device the standard gamepad bindings
    #[serde(default)]
    pub gamepad: bool,
    /// SDL mapping string, overrides `gamepad`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    /// Explicit binding table, overrides `gamepad`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<Vec<Binding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hats: Option<usize>,
}

/// Press or release requested by the host
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SyntheticEdge {
    pub device: usize,
    pub slot: usize,
    pub down: bool,
}

impl AttachSpec {
    fn build(&self) -> Result<VirtualDevice> {
        let mut device = if self.gamepad {
            VirtualDevice::standard_gamepad(&self.name)
        } else {
            VirtualDevice::joystick(&self.name)
        };

        if let Some(text) = &self.mapping {
            let mapping = Mapping::parse(text)
                .with_context(|| format!("Invalid mapping for device {}", self.id))?;
            device.info.guid = mapping.guid;
            if device.info.kind == GamepadKind::Unknown {
                device.info.kind = GamepadKind::Standard;
            }
            device = device.with_mapping(mapping);
        } else if let Some(bindings) = &self.bindings {
            let guid = device.info.guid;
            device = device.with_mapping(Mapping {
                guid,
                name: self.name.clone(),
                bindings: bindings.clone(),
            });
        }

        if let Some(buttons) = self.buttons {
            device.info.button_count = buttons;
        }
        if let Some(axes) = self.axes {
            device.info.axis_count = axes;
        }
        if let Some(hats) = self.hats {
            device.info.hat_count = hats;
        }

        Ok(device)
    }
}

impl ReplayScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse replay script: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

impl ReplayFrame {
    /// Apply hardware changes of this frame to the layer
    ///
    /// Detaches run before attaches so a frame can swap a device in place.
    pub fn apply(&self, layer: &mut VirtualLayer) -> Result<()> {
        for id in &self.detach {
            layer.detach(*id);
        }
        for spec in &self.attach {
            layer.attach(spec.id, spec.build()?);
        }
        for event in &self.events {
            layer.push_event(*event);
        }
        Ok(())
    }
}
