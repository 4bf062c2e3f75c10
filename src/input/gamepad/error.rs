//! Errors surfaced by the gamepad hub

use super::layer::LayerError;

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("device index {index} out of range ({count} devices tracked)")]
    DeviceOutOfRange { index: usize, count: usize },

    #[error("slot index {0} out of range")]
    SlotOutOfRange(usize),

    #[error("device {0} has no gamepad mapping")]
    NotAGamepad(usize),

    #[error("slot {0} is not an axis")]
    NotAnAxis(usize),

    #[error("slot {0} is a wildcard and cannot be pressed directly")]
    WildcardSlot(usize),

    #[error("device enumeration failed")]
    Enumeration(#[source] LayerError),

    #[error(transparent)]
    Layer(#[from] LayerError),
}
