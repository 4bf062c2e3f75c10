//! Reverse lookup from logical gamepad inputs to raw joystick inputs
//!
//! The device layer reports, per gamepad-capable device, which raw button, axis
//! or hat position drives each standard gamepad output. The resolver walks that
//! table backwards so a logical press can be mirrored onto the raw slot the
//! player physically touched.

use super::index::{
    decode_hat_mask, raw_axis_slot, raw_button_slot, raw_hat_slot, LogicalAxis, LogicalButton,
    Slot, SlotKind, ANY_AXIS, ANY_BUTTON,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw side of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingInput {
    /// Output exists in the layout but nothing drives it
    None,
    Button(usize),
    Axis(usize),
    Hat { hat: usize, mask: u8 },
}

/// Logical side of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingOutput {
    Button(LogicalButton),
    Axis(LogicalAxis),
}

/// One entry of a device's binding table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub input: BindingInput,
    pub output: BindingOutput,
}

impl BindingOutput {
    /// Key used for this output in SDL mapping strings
    pub fn mapping_key(self) -> &'static str {
        match self {
            Self::Button(LogicalButton::South) => "a",
            Self::Button(LogicalButton::East) => "b",
            Self::Button(LogicalButton::West) => "x",
            Self::Button(LogicalButton::North) => "y",
            Self::Button(button) => button.name(),
            Self::Axis(axis) => axis.name(),
        }
    }

    pub fn from_mapping_key(key: &str) -> Option<Self> {
        let face = match key {
            "a" => Some(LogicalButton::South),
            "b" => Some(LogicalButton::East),
            "x" => Some(LogicalButton::West),
            "y" => Some(LogicalButton::North),
            _ => None,
        };
        if let Some(button) = face {
            return Some(Self::Button(button));
        }

        LogicalButton::ALL
            .into_iter()
            .map(Self::Button)
            .chain(LogicalAxis::ALL.into_iter().map(Self::Axis))
            .find(|output| output.mapping_key() == key)
    }
}

impl fmt::Display for BindingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::None => Ok(()),
            Self::Button(n) => write!(f, "b{}", n),
            Self::Axis(n) => write!(f, "a{}", n),
            Self::Hat { hat, mask } => write!(f, "h{}.{}", hat, mask),
        }
    }
}

/// Error raised while parsing an SDL mapping string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("mapping needs at least a GUID and a name")]
    MissingHeader,

    #[error("invalid GUID '{0}'")]
    InvalidGuid(String),

    #[error("invalid input '{input}' for '{key}'")]
    InvalidInput { key: String, input: String },
}

/// SDL-style controller mapping: `GUID,name,a:b0,leftx:a0,dpup:h0.1,...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub guid: [u8; 16],
    pub name: String,
    pub bindings: Vec<Binding>,
}

impl Mapping {
    /// Parse a mapping string
    ///
    /// Unknown keys (`platform`, `crc`, outputs this layout does not have) are
    /// skipped. Half-axis and inversion modifiers (`+leftx`, `-a1`, `a2~`) are
    /// accepted and dropped; a binding only records which raw input drives an
    /// output.
    pub fn parse(text: &str) -> Result<Self, MappingError> {
        let mut fields = text.trim().split(',');
        let guid_text = fields.next().filter(|g| !g.is_empty()).ok_or(MappingError::MissingHeader)?;
        let name = fields.next().ok_or(MappingError::MissingHeader)?.to_string();

        let mut guid = [0u8; 16];
        hex::decode_to_slice(guid_text, &mut guid)
            .map_err(|_| MappingError::InvalidGuid(guid_text.to_string()))?;

        let mut bindings = Vec::new();
        for field in fields.filter(|f| !f.is_empty()) {
            let Some((key, input)) = field.split_once(':') else {
                continue;
            };
            let key = key.trim_start_matches(['+', '-']);
            let Some(output) = BindingOutput::from_mapping_key(key) else {
                continue;
            };

            let input = parse_input(input).ok_or_else(|| MappingError::InvalidInput {
                key: key.to_string(),
                input: input.to_string(),
            })?;
            bindings.push(Binding { input, output });
        }

        Ok(Self { guid, name, bindings })
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", hex::encode(self.guid), self.name)?;
        for binding in self.bindings.iter().filter(|b| b.input != BindingInput::None) {
            write!(f, ",{}:{}", binding.output.mapping_key(), binding.input)?;
        }
        Ok(())
    }
}

fn parse_input(text: &str) -> Option<BindingInput> {
    let text = text.trim_start_matches(['+', '-']).trim_end_matches('~');
    if text.is_empty() {
        return Some(BindingInput::None);
    }

    let mut chars = text.chars();
    let kind = chars.next()?;
    let rest = chars.as_str();
    match kind {
        'b' => rest.parse().ok().map(BindingInput::Button),
        'a' => rest.parse().ok().map(BindingInput::Axis),
        'h' => {
            let (hat, mask) = rest.split_once('.')?;
            Some(BindingInput::Hat { hat: hat.parse().ok()?, mask: mask.parse().ok()? })
        },
        _ => None,
    }
}

/// Raw slot a logical slot is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBinding {
    /// Slot of the raw input in the unified table
    pub raw: Slot,
    /// Wildcard matching the raw input kind (buttons and hats: any button)
    pub wildcard: Slot,
}

/// Find the raw slot bound to `logical`
///
/// The first table entry whose output matches decides the answer, even if it
/// says the output is unbound. A hat binding on a diagonal resolves to its
/// first decoded direction. Non-logical slots and raw-only devices (empty
/// table) never resolve.
pub fn resolve_raw_index(bindings: &[Binding], logical: Slot) -> Option<ResolvedBinding> {
    let wanted = match logical.kind() {
        SlotKind::LogicalButton(button) => BindingOutput::Button(button),
        SlotKind::LogicalAxis(axis) => BindingOutput::Axis(axis),
        _ => return None,
    };

    let binding = bindings.iter().find(|b| b.output == wanted)?;

    match binding.input {
        BindingInput::None => None,
        BindingInput::Button(button) => raw_button_slot(button).map(|raw| ResolvedBinding {
            raw,
            wildcard: ANY_BUTTON,
        }),
        BindingInput::Axis(axis) => raw_axis_slot(axis).map(|raw| ResolvedBinding {
            raw,
            wildcard: ANY_AXIS,
        }),
        BindingInput::Hat { hat, mask } => {
            let direction = decode_hat_mask(mask).first()?;
            raw_hat_slot(hat, *direction).map(|raw| ResolvedBinding {
                raw,
                wildcard: ANY_BUTTON,
            })
        },
    }
}
