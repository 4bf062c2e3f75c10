//! Unified input index space
//!
//! Every tracked device owns one flat table of [`SLOT_COUNT`] slots. Raw joystick
//! inputs, logical gamepad inputs and the three wildcard slots all live in that
//! single index space:
//!
//! ```text
//!   0 ..  60   raw joystick buttons
//!  60 ..  80   raw joystick axes
//!  80 .. 100   raw hat directions (4 per hat: up, down, left, right)
//! 100 .. 126   logical gamepad buttons
//! 126 .. 132   logical gamepad axes
//!        132   any button
//!        133   any axis
//!        134   any input
//! ```
//!
//! Everything here is pure arithmetic. Conversions that can fall outside the
//! table return `None` and the caller decides what to do.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of raw joystick button slots
pub const RAW_BUTTON_MAX: usize = 60;

/// First raw joystick axis slot
pub const RAW_AXIS_BASE: usize = RAW_BUTTON_MAX;

/// First raw hat-direction slot
pub const RAW_HAT_BASE: usize = 80;

/// Number of raw joystick axis slots
pub const RAW_AXIS_MAX: usize = RAW_HAT_BASE - RAW_AXIS_BASE;

/// Directions tracked per physical hat
pub const HAT_DIRECTIONS: usize = 4;

/// First logical gamepad button slot
pub const LOGICAL_BUTTON_BASE: usize = 100;

/// Number of physical hats that fit in the raw hat range
pub const RAW_HAT_MAX: usize = (LOGICAL_BUTTON_BASE - RAW_HAT_BASE) / HAT_DIRECTIONS;

/// Number of defined logical gamepad buttons
pub const LOGICAL_BUTTON_COUNT: usize = LogicalButton::ALL.len();

/// First logical gamepad axis slot
pub const LOGICAL_AXIS_BASE: usize = LOGICAL_BUTTON_BASE + LOGICAL_BUTTON_COUNT;

/// Number of defined logical gamepad axes
pub const LOGICAL_AXIS_COUNT: usize = LogicalAxis::ALL.len();

/// Wildcard slot raised by any button-like input
pub const ANY_BUTTON: Slot = Slot(LOGICAL_AXIS_BASE + LOGICAL_AXIS_COUNT);

/// Wildcard slot raised by any axis leaving or returning to center
pub const ANY_AXIS: Slot = Slot(ANY_BUTTON.0 + 1);

/// Wildcard slot raised by any input at all
pub const ANY_INPUT: Slot = Slot(ANY_BUTTON.0 + 2);

/// Length of every device's slot table
pub const SLOT_COUNT: usize = ANY_INPUT.0 + 1;

/// SDL-style hat masks
pub mod hat_mask {
    pub const CENTERED: u8 = 0x00;
    pub const UP: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const DOWN: u8 = 0x04;
    pub const LEFT: u8 = 0x08;
    pub const RIGHT_UP: u8 = RIGHT | UP;
    pub const RIGHT_DOWN: u8 = RIGHT | DOWN;
    pub const LEFT_UP: u8 = LEFT | UP;
    pub const LEFT_DOWN: u8 = LEFT | DOWN;
}

/// Standard gamepad buttons, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalButton {
    South,
    East,
    West,
    North,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Misc1,
    RightPaddle1,
    LeftPaddle1,
    RightPaddle2,
    LeftPaddle2,
    Touchpad,
    Misc2,
    Misc3,
    Misc4,
    Misc5,
    Misc6,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 26] = [
        Self::South,
        Self::East,
        Self::West,
        Self::North,
        Self::Back,
        Self::Guide,
        Self::Start,
        Self::LeftStick,
        Self::RightStick,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::DpadUp,
        Self::DpadDown,
        Self::DpadLeft,
        Self::DpadRight,
        Self::Misc1,
        Self::RightPaddle1,
        Self::LeftPaddle1,
        Self::RightPaddle2,
        Self::LeftPaddle2,
        Self::Touchpad,
        Self::Misc2,
        Self::Misc3,
        Self::Misc4,
        Self::Misc5,
        Self::Misc6,
    ];

    /// Position of this button inside the logical button range
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::North => "north",
            Self::Back => "back",
            Self::Guide => "guide",
            Self::Start => "start",
            Self::LeftStick => "leftstick",
            Self::RightStick => "rightstick",
            Self::LeftShoulder => "leftshoulder",
            Self::RightShoulder => "rightshoulder",
            Self::DpadUp => "dpup",
            Self::DpadDown => "dpdown",
            Self::DpadLeft => "dpleft",
            Self::DpadRight => "dpright",
            Self::Misc1 => "misc1",
            Self::RightPaddle1 => "paddle1",
            Self::LeftPaddle1 => "paddle2",
            Self::RightPaddle2 => "paddle3",
            Self::LeftPaddle2 => "paddle4",
            Self::Touchpad => "touchpad",
            Self::Misc2 => "misc2",
            Self::Misc3 => "misc3",
            Self::Misc4 => "misc4",
            Self::Misc5 => "misc5",
            Self::Misc6 => "misc6",
        }
    }
}

/// Standard gamepad axes, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl LogicalAxis {
    pub const ALL: [LogicalAxis; 6] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Triggers are one-sided and use the threshold instead of the deadzone
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::LeftTrigger | Self::RightTrigger)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftX => "leftx",
            Self::LeftY => "lefty",
            Self::RightX => "rightx",
            Self::RightY => "righty",
            Self::LeftTrigger => "lefttrigger",
            Self::RightTrigger => "righttrigger",
        }
    }
}

/// Cardinal direction of a hat, in per-hat slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HatDirection {
    pub const ALL: [HatDirection; HAT_DIRECTIONS] =
        [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn offset(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Decompose an SDL hat mask into its cardinal directions
///
/// Diagonals yield two directions with the vertical one first. A centered
/// mask, or any combination that is not one of the eight hat positions,
/// yields no direction.
pub fn decode_hat_mask(mask: u8) -> &'static [HatDirection] {
    use HatDirection::*;

    match mask {
        hat_mask::UP => &[Up],
        hat_mask::DOWN => &[Down],
        hat_mask::LEFT => &[Left],
        hat_mask::RIGHT => &[Right],
        hat_mask::LEFT_UP => &[Up, Left],
        hat_mask::LEFT_DOWN => &[Down, Left],
        hat_mask::RIGHT_UP => &[Up, Right],
        hat_mask::RIGHT_DOWN => &[Down, Right],
        _ => &[],
    }
}

/// One position in a device's unified slot table
///
/// A `Slot` is always inside the table; constructing one is the bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slot(usize);

/// What a slot stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    RawButton(usize),
    RawAxis(usize),
    RawHat { hat: usize, direction: HatDirection },
    LogicalButton(LogicalButton),
    LogicalAxis(LogicalAxis),
    AnyButton,
    AnyAxis,
    AnyInput,
}

impl Slot {
    /// Bounds-checked construction from a flat index
    pub fn new(index: usize) -> Option<Self> {
        (index < SLOT_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn kind(self) -> SlotKind {
        let i = self.0;
        if i < RAW_AXIS_BASE {
            SlotKind::RawButton(i)
        } else if i < RAW_HAT_BASE {
            SlotKind::RawAxis(i - RAW_AXIS_BASE)
        } else if i < LOGICAL_BUTTON_BASE {
            let offset = i - RAW_HAT_BASE;
            SlotKind::RawHat {
                hat: offset / HAT_DIRECTIONS,
                direction: HatDirection::ALL[offset % HAT_DIRECTIONS],
            }
        } else if i < LOGICAL_AXIS_BASE {
            SlotKind::LogicalButton(LogicalButton::ALL[i - LOGICAL_BUTTON_BASE])
        } else if i < ANY_BUTTON.0 {
            SlotKind::LogicalAxis(LogicalAxis::ALL[i - LOGICAL_AXIS_BASE])
        } else if self == ANY_BUTTON {
            SlotKind::AnyButton
        } else if self == ANY_AXIS {
            SlotKind::AnyAxis
        } else {
            SlotKind::AnyInput
        }
    }

    /// True for logical gamepad button and axis slots
    pub fn is_logical(self) -> bool {
        (LOGICAL_BUTTON_BASE..ANY_BUTTON.0).contains(&self.0)
    }

    pub fn is_wildcard(self) -> bool {
        self.0 >= ANY_BUTTON.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            SlotKind::RawButton(n) => write!(f, "button{}", n),
            SlotKind::RawAxis(n) => write!(f, "axis{}", n),
            SlotKind::RawHat { hat, direction } => write!(f, "hat{}.{}", hat, direction.name()),
            SlotKind::LogicalButton(b) => write!(f, "gamepad.{}", b.name()),
            SlotKind::LogicalAxis(a) => write!(f, "gamepad.{}", a.name()),
            SlotKind::AnyButton => f.write_str("any_button"),
            SlotKind::AnyAxis => f.write_str("any_axis"),
            SlotKind::AnyInput => f.write_str("any_input"),
        }
    }
}

/// Stable display name for a slot (`button3`, `hat0.up`, `gamepad.south`, ...)
pub fn slot_name(slot: Slot) -> String {
    slot.to_string()
}

pub fn raw_button_slot(button: usize) -> Option<Slot> {
    (button < RAW_BUTTON_MAX).then_some(Slot(button))
}

pub fn raw_axis_slot(axis: usize) -> Option<Slot> {
    (axis < RAW_AXIS_MAX).then_some(Slot(RAW_AXIS_BASE + axis))
}

pub fn raw_hat_slot(hat: usize, direction: HatDirection) -> Option<Slot> {
    (hat < RAW_HAT_MAX).then_some(Slot(RAW_HAT_BASE + hat * HAT_DIRECTIONS + direction.offset()))
}

pub fn logical_button_slot(button: LogicalButton) -> Slot {
    Slot(LOGICAL_BUTTON_BASE + button.index())
}

pub fn logical_axis_slot(axis: LogicalAxis) -> Slot {
    Slot(LOGICAL_AXIS_BASE + axis.index())
}
