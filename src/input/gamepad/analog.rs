//! Analog axis processing (normalization, deadzone, threshold)

use super::index::{LogicalAxis, SlotKind};

/// Deadzone and threshold given to newly attached devices
pub const DEFAULT_DEADZONE: f64 = 0.05;

/// Full-scale magnitude of a raw device axis
const RAW_AXIS_FULL_SCALE: f64 = 32767.0;

/// Which response parameter an axis uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Two-sided stick axis, uses the deadzone
    Stick,
    /// One-sided trigger axis, uses the threshold
    Trigger,
}

impl AxisKind {
    /// Static classification of an axis slot
    ///
    /// Only the two logical triggers are one-sided. Raw axes carry no layout
    /// information, so they are always treated as sticks.
    pub fn of(kind: SlotKind) -> Option<Self> {
        match kind {
            SlotKind::RawAxis(_) => Some(Self::Stick),
            SlotKind::LogicalAxis(axis) => Some(Self::of_logical(axis)),
            _ => None,
        }
    }

    pub fn of_logical(axis: LogicalAxis) -> Self {
        if axis.is_trigger() {
            Self::Trigger
        } else {
            Self::Stick
        }
    }
}

/// Convert a raw device axis reading to -1.0..=1.0
pub fn normalize_raw(raw: i16) -> f64 {
    (raw as f64 / RAW_AXIS_FULL_SCALE).clamp(-1.0, 1.0)
}

/// Clamp a response parameter into 0.0..=1.0 (NaN becomes 0.0)
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Apply a deadzone to a normalized axis value
///
/// Magnitudes up to `deadzone` read as exactly 0.0. Above it,
/// `[deadzone..1.0]` is stretched back onto `[0.0..1.0]` with the sign kept.
/// `deadzone` must already be clamped to 0.0..=1.0.
pub fn apply_deadzone(value: f64, deadzone: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude <= deadzone {
        return 0.0;
    }

    value.signum() * (magnitude - deadzone) / (1.0 - deadzone)
}

/// Trigger counterpart of [`apply_deadzone`]
pub fn apply_threshold(value: f64, threshold: f64) -> f64 {
    apply_deadzone(value, threshold)
}

/// Run a normalized value through the curve its axis kind calls for
pub fn respond(value: f64, kind: AxisKind, deadzone: f64, threshold: f64) -> f64 {
    match kind {
        AxisKind::Stick => apply_deadzone(value, deadzone),
        AxisKind::Trigger => apply_threshold(value, threshold),
    }
}
