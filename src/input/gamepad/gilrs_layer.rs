//! Device layer backed by gilrs
//!
//! gilrs exposes a single view per controller, keyed by its own button and axis
//! enums plus a platform `Code` for every element. The layer rebuilds both views
//! the engine expects from that:
//!
//! - raw joystick indices are assigned per device by sorting the element codes,
//!   so the same controller always gets the same numbering;
//! - the logical gamepad view exists only when gilrs has a mapping for the
//!   device (SDL database or driver layout);
//! - the D-pad axes become raw hat 0.
//!
//! Logical Y axes are flipped so that down is positive, like SDL.

use super::binding::{Binding, BindingInput, BindingOutput};
use super::index::{hat_mask, LogicalAxis, LogicalButton};
use super::layer::{DeviceInfo, DeviceLayer, GamepadKind, HardwareEvent, HardwareId, LayerError};
use anyhow::{Context, Result};
use gilrs::ev::Code;
use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs, GilrsBuilder, MappingSource};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Full-scale value of a 16-bit device axis
const AXIS_SCALE: f32 = 32767.0;

/// Map a gilrs button to the logical gamepad button at the same position
///
/// Triggers are analog on most pads and handled as axes.
pub fn logical_button_of(button: Button) -> Option<LogicalButton> {
    match button {
        Button::South => Some(LogicalButton::South),
        Button::East => Some(LogicalButton::East),
        Button::North => Some(LogicalButton::North),
        Button::West => Some(LogicalButton::West),
        Button::LeftTrigger => Some(LogicalButton::LeftShoulder),
        Button::RightTrigger => Some(LogicalButton::RightShoulder),
        Button::Select => Some(LogicalButton::Back),
        Button::Start => Some(LogicalButton::Start),
        Button::Mode => Some(LogicalButton::Guide),
        Button::LeftThumb => Some(LogicalButton::LeftStick),
        Button::RightThumb => Some(LogicalButton::RightStick),
        Button::DPadUp => Some(LogicalButton::DpadUp),
        Button::DPadDown => Some(LogicalButton::DpadDown),
        Button::DPadLeft => Some(LogicalButton::DpadLeft),
        Button::DPadRight => Some(LogicalButton::DpadRight),
        Button::C => Some(LogicalButton::Misc1),
        Button::Z => Some(LogicalButton::Misc2),
        Button::LeftTrigger2 | Button::RightTrigger2 => None,
        _ => {
            trace!("Unmapped gilrs button: {:?}", button);
            None
        },
    }
}

/// Inverse of [`logical_button_of`]
pub fn gilrs_button_of(button: LogicalButton) -> Option<Button> {
    let all = [
        Button::South,
        Button::East,
        Button::North,
        Button::West,
        Button::LeftTrigger,
        Button::RightTrigger,
        Button::Select,
        Button::Start,
        Button::Mode,
        Button::LeftThumb,
        Button::RightThumb,
        Button::DPadUp,
        Button::DPadDown,
        Button::DPadLeft,
        Button::DPadRight,
        Button::C,
        Button::Z,
    ];
    all.into_iter().find(|b| logical_button_of(*b) == Some(button))
}

/// Map a gilrs stick axis to the logical axis it drives
pub fn logical_axis_of(axis: Axis) -> Option<LogicalAxis> {
    match axis {
        Axis::LeftStickX => Some(LogicalAxis::LeftX),
        Axis::LeftStickY => Some(LogicalAxis::LeftY),
        Axis::RightStickX => Some(LogicalAxis::RightX),
        Axis::RightStickY => Some(LogicalAxis::RightY),
        Axis::LeftZ => Some(LogicalAxis::LeftTrigger),
        Axis::RightZ => Some(LogicalAxis::RightTrigger),
        Axis::DPadX | Axis::DPadY => None,
        _ => {
            trace!("Unmapped gilrs axis: {:?}", axis);
            None
        },
    }
}

fn gilrs_axis_of(axis: LogicalAxis) -> Axis {
    match axis {
        LogicalAxis::LeftX => Axis::LeftStickX,
        LogicalAxis::LeftY => Axis::LeftStickY,
        LogicalAxis::RightX => Axis::RightStickX,
        LogicalAxis::RightY => Axis::RightStickY,
        LogicalAxis::LeftTrigger => Axis::LeftZ,
        LogicalAxis::RightTrigger => Axis::RightZ,
    }
}

/// Analog trigger button standing in for a trigger axis
fn trigger_button_of(axis: LogicalAxis) -> Option<Button> {
    match axis {
        LogicalAxis::LeftTrigger => Some(Button::LeftTrigger2),
        LogicalAxis::RightTrigger => Some(Button::RightTrigger2),
        _ => None,
    }
}

/// Convert a gilrs logical value to the 16-bit device scale
fn to_device_value(axis: LogicalAxis, value: f32) -> i16 {
    let value = match axis {
        LogicalAxis::LeftY | LogicalAxis::RightY => -value,
        _ => value,
    };
    (value * AXIS_SCALE).clamp(-AXIS_SCALE, AXIS_SCALE) as i16
}

fn raw_device_value(value: f32) -> i16 {
    (value * AXIS_SCALE).clamp(-AXIS_SCALE, AXIS_SCALE) as i16
}

/// Combine D-pad axis positions into an SDL hat mask
fn hat_from_dpad(x: f32, y: f32) -> u8 {
    let mut mask = hat_mask::CENTERED;
    if y > 0.5 {
        mask |= hat_mask::UP;
    } else if y < -0.5 {
        mask |= hat_mask::DOWN;
    }
    if x > 0.5 {
        mask |= hat_mask::RIGHT;
    } else if x < -0.5 {
        mask |= hat_mask::LEFT;
    }
    mask
}

/// Controller family guessed from USB IDs
fn kind_of(vendor: Option<u16>, product: Option<u16>) -> GamepadKind {
    match (vendor, product) {
        (Some(0x045e), Some(0x028e)) => GamepadKind::Xbox360,
        (Some(0x045e), _) => GamepadKind::XboxOne,
        (Some(0x054c), Some(0x0268)) => GamepadKind::Ps3,
        (Some(0x054c), Some(0x0ce6) | Some(0x0df2)) => GamepadKind::Ps5,
        (Some(0x054c), _) => GamepadKind::Ps4,
        (Some(0x057e), Some(0x2006)) => GamepadKind::SwitchJoyconLeft,
        (Some(0x057e), Some(0x2007)) => GamepadKind::SwitchJoyconRight,
        (Some(0x057e), _) => GamepadKind::SwitchPro,
        _ => GamepadKind::Standard,
    }
}

fn has_mapping(gamepad: &Gamepad<'_>) -> bool {
    gamepad.mapping_source() != MappingSource::None
}

/// Stable raw numbering of one device's element codes
#[derive(Debug, Clone, Default)]
struct CodeTable {
    buttons: Vec<Code>,
    axes: Vec<Code>,
    dpad: (f32, f32),
}

impl CodeTable {
    fn new(gamepad: &Gamepad<'_>) -> Self {
        let mut buttons: Vec<Code> = gamepad.state().buttons().map(|(code, _)| code).collect();
        let mut axes: Vec<Code> = gamepad.state().axes().map(|(code, _)| code).collect();

        // D-pad axes are reported as a hat, not as raw axes
        let dpad: Vec<Code> = [Axis::DPadX, Axis::DPadY]
            .into_iter()
            .filter_map(|axis| gamepad.axis_code(axis))
            .collect();
        axes.retain(|code| !dpad.contains(code));

        buttons.sort_by_key(|code| code.into_u32());
        axes.sort_by_key(|code| code.into_u32());
        Self { buttons, axes, dpad: (0.0, 0.0) }
    }

    fn button_index(&mut self, code: Code) -> usize {
        index_of(&mut self.buttons, code)
    }

    fn axis_index(&mut self, code: Code) -> usize {
        index_of(&mut self.axes, code)
    }
}

fn index_of(codes: &mut Vec<Code>, code: Code) -> usize {
    match codes.iter().position(|c| *c == code) {
        Some(index) => index,
        None => {
            codes.push(code);
            codes.len() - 1
        },
    }
}

/// Handle given out by [`GilrsLayer`]
#[derive(Debug)]
pub struct GilrsHandle {
    id: HardwareId,
    gamepad_id: GamepadId,
    gamepad: bool,
}

pub struct GilrsLayer {
    gilrs: Gilrs,
    ids: HashMap<HardwareId, GamepadId>,
    tables: HashMap<GamepadId, CodeTable>,
    effects: HashMap<GamepadId, Effect>,
    pending: VecDeque<HardwareEvent>,
}

impl GilrsLayer {
    /// Initialize gilrs, optionally loading an extra SDL mapping database
    pub fn new(mapping_db: Option<&Path>) -> Result<Self> {
        let mut builder = GilrsBuilder::new();
        if let Some(path) = mapping_db {
            let mappings = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read mapping database: {}", path.display()))?;
            info!("Loaded gamepad mapping database {}", path.display());
            builder = builder.add_mappings(&mappings);
        }

        let gilrs = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize GilRs: {}", e))?;
        info!("GilRs initialized");

        Ok(Self {
            gilrs,
            ids: HashMap::new(),
            tables: HashMap::new(),
            effects: HashMap::new(),
            pending: VecDeque::new(),
        })
    }

    fn hardware_id_of(id: GamepadId) -> HardwareId {
        HardwareId(usize::from(id) as u32)
    }

    fn table(&mut self, id: GamepadId) -> &mut CodeTable {
        let gilrs = &self.gilrs;
        self.tables.entry(id).or_insert_with(|| CodeTable::new(&gilrs.gamepad(id)))
    }

    /// Translate one gilrs event into the raw and logical events it stands for
    fn translate(&mut self, id: GamepadId, event: EventType) {
        let which = Self::hardware_id_of(id);
        let mapped = self.gilrs.connected_gamepad(id).is_some_and(|g| has_mapping(&g));

        match event {
            EventType::ButtonPressed(button, code) | EventType::ButtonReleased(button, code) => {
                let down = matches!(event, EventType::ButtonPressed(..));
                let raw = self.table(id).button_index(code);
                self.pending.push_back(HardwareEvent::JoystickButton { which, button: raw, down });

                if let Some(button) = logical_button_of(button).filter(|_| mapped) {
                    self.pending.push_back(HardwareEvent::GamepadButton { which, button, down });
                }
            },

            EventType::ButtonChanged(button, value, _) => {
                let axis = match button {
                    Button::LeftTrigger2 => LogicalAxis::LeftTrigger,
                    Button::RightTrigger2 => LogicalAxis::RightTrigger,
                    _ => return,
                };
                if mapped {
                    let value = to_device_value(axis, value);
                    self.pending.push_back(HardwareEvent::GamepadAxis { which, axis, value });
                }
            },

            EventType::AxisChanged(axis @ (Axis::DPadX | Axis::DPadY), value, _) => {
                let table = self.table(id);
                if axis == Axis::DPadX {
                    table.dpad.0 = value;
                } else {
                    table.dpad.1 = value;
                }
                let mask = hat_from_dpad(table.dpad.0, table.dpad.1);
                self.pending.push_back(HardwareEvent::JoystickHat { which, hat: 0, mask });
            },

            EventType::AxisChanged(axis, value, code) => {
                let raw = self.table(id).axis_index(code);
                self.pending.push_back(HardwareEvent::JoystickAxis {
                    which,
                    axis: raw,
                    value: raw_device_value(value),
                });

                if let Some(axis) = logical_axis_of(axis).filter(|_| mapped) {
                    let value = to_device_value(axis, value);
                    self.pending.push_back(HardwareEvent::GamepadAxis { which, axis, value });
                }
            },

            EventType::Connected => info!("🎮 Gamepad {} connected", which),
            EventType::Disconnected => info!("🔌 Gamepad {} disconnected", which),
            _ => {},
        }
    }
}

impl DeviceLayer for GilrsLayer {
    type Handle = GilrsHandle;

    fn update(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            self.translate(id, event);
        }
    }

    fn connected_ids(&mut self) -> Result<Vec<HardwareId>, LayerError> {
        self.ids.clear();
        let mut ids = Vec::new();
        for (gamepad_id, _) in self.gilrs.gamepads() {
            let id = Self::hardware_id_of(gamepad_id);
            self.ids.insert(id, gamepad_id);
            ids.push(id);
        }
        Ok(ids)
    }

    fn open_gamepad(&mut self, id: HardwareId) -> Option<GilrsHandle> {
        let gamepad_id = *self.ids.get(&id)?;
        let mapped = has_mapping(&self.gilrs.connected_gamepad(gamepad_id)?);
        if !mapped {
            return None;
        }
        self.table(gamepad_id);
        Some(GilrsHandle { id, gamepad_id, gamepad: true })
    }

    fn open_joystick(&mut self, id: HardwareId) -> Option<GilrsHandle> {
        let gamepad_id = *self.ids.get(&id)?;
        self.gilrs.connected_gamepad(gamepad_id)?;
        self.table(gamepad_id);
        Some(GilrsHandle { id, gamepad_id, gamepad: false })
    }

    fn close(&mut self, handle: GilrsHandle) {
        self.effects.remove(&handle.gamepad_id);
        self.tables.remove(&handle.gamepad_id);
        debug!("Closed gilrs device {}", handle.id);
    }

    fn is_connected(&self, handle: &GilrsHandle) -> bool {
        self.gilrs.connected_gamepad(handle.gamepad_id).is_some()
    }

    fn hardware_id(&self, handle: &GilrsHandle) -> HardwareId {
        handle.id
    }

    fn is_gamepad(&self, handle: &GilrsHandle) -> bool {
        handle.gamepad
    }

    fn info(&self, handle: &GilrsHandle) -> DeviceInfo {
        let gamepad = self.gilrs.gamepad(handle.gamepad_id);
        let (button_count, axis_count) = self
            .tables
            .get(&handle.gamepad_id)
            .map(|t| (t.buttons.len(), t.axes.len()))
            .unwrap_or((0, 0));

        DeviceInfo {
            name: gamepad.name().to_string(),
            guid: gamepad.uuid(),
            kind: if handle.gamepad {
                kind_of(gamepad.vendor_id(), gamepad.product_id())
            } else {
                GamepadKind::Unknown
            },
            button_count,
            axis_count,
            hat_count: usize::from(gamepad.axis_code(Axis::DPadX).is_some()),
        }
    }

    fn joystick_button(&self, handle: &GilrsHandle, button: usize) -> bool {
        let Some(code) = self.tables.get(&handle.gamepad_id).and_then(|t| t.buttons.get(button))
        else {
            return false;
        };
        self.gilrs.gamepad(handle.gamepad_id).state().is_pressed(*code)
    }

    fn joystick_axis(&self, handle: &GilrsHandle, axis: usize) -> i16 {
        let Some(code) = self.tables.get(&handle.gamepad_id).and_then(|t| t.axes.get(axis)) else {
            return 0;
        };
        raw_device_value(self.gilrs.gamepad(handle.gamepad_id).state().value(*code))
    }

    fn joystick_hat(&self, handle: &GilrsHandle, hat: usize) -> u8 {
        if hat != 0 {
            return hat_mask::CENTERED;
        }
        let gamepad = self.gilrs.gamepad(handle.gamepad_id);
        hat_from_dpad(gamepad.value(Axis::DPadX), gamepad.value(Axis::DPadY))
    }

    fn gamepad_button(&self, handle: &GilrsHandle, button: LogicalButton) -> bool {
        handle.gamepad
            && gilrs_button_of(button)
                .is_some_and(|b| self.gilrs.gamepad(handle.gamepad_id).is_pressed(b))
    }

    fn gamepad_axis(&self, handle: &GilrsHandle, axis: LogicalAxis) -> i16 {
        if !handle.gamepad {
            return 0;
        }

        let gamepad = self.gilrs.gamepad(handle.gamepad_id);
        let value = match trigger_button_of(axis).and_then(|b| gamepad.button_data(b)) {
            Some(data) if gamepad.axis_data(gilrs_axis_of(axis)).is_none() => data.value(),
            _ => gamepad.value(gilrs_axis_of(axis)),
        };
        to_device_value(axis, value)
    }

    fn bindings(&self, handle: &GilrsHandle) -> Vec<Binding> {
        if !handle.gamepad {
            return Vec::new();
        }

        // Indices for codes not seen yet are appended by `table`, which needs
        // `&mut self`; work on a scratch copy of the numbering instead.
        let mut scratch = BindingScratch {
            gilrs: &self.gilrs,
            table: self.tables.get(&handle.gamepad_id).cloned().unwrap_or_default(),
        };
        scratch.bindings(handle.gamepad_id)
    }

    fn poll_event(&mut self) -> Option<HardwareEvent> {
        self.pending.pop_front()
    }

    fn rumble(
        &mut self,
        handle: &GilrsHandle,
        low: u16,
        high: u16,
        duration_ms: u32,
    ) -> Result<(), LayerError> {
        if !self.is_connected(handle) {
            return Err(LayerError::NotConnected(handle.id));
        }

        // A zero request stops the current effect
        if duration_ms == 0 || (low == 0 && high == 0) {
            self.effects.remove(&handle.gamepad_id);
            return Ok(());
        }

        let scheduling = Replay { play_for: Ticks::from_ms(duration_ms), ..Default::default() };
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong { magnitude: low },
                scheduling,
                envelope: Default::default(),
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak { magnitude: high },
                scheduling,
                envelope: Default::default(),
            })
            .gamepads(&[handle.gamepad_id])
            .finish(&mut self.gilrs)
            .map_err(|e| LayerError::Backend(e.to_string()))?;

        effect.play().map_err(|e| LayerError::Backend(e.to_string()))?;
        self.effects.insert(handle.gamepad_id, effect);
        Ok(())
    }

    fn set_led(&mut self, handle: &GilrsHandle, _red: u8, _green: u8, _blue: u8) -> Result<(), LayerError> {
        warn!("LED control is not available through gilrs (device {})", handle.id);
        Err(LayerError::Unsupported("led"))
    }

    fn mapping(&self, handle: &GilrsHandle) -> Option<String> {
        if !handle.gamepad {
            return None;
        }
        let gamepad = self.gilrs.gamepad(handle.gamepad_id);
        gamepad.map_name().map(str::to_string)
    }

    fn set_mapping(&mut self, handle: &mut GilrsHandle, _mapping: Option<&str>) -> Result<(), LayerError> {
        warn!("Runtime mapping changes are not supported by gilrs (device {})", handle.id);
        Err(LayerError::Unsupported("set_mapping"))
    }
}

/// Binding table builder working on a copy of a device's code numbering
struct BindingScratch<'a> {
    gilrs: &'a Gilrs,
    table: CodeTable,
}

impl BindingScratch<'_> {
    fn bindings(&mut self, id: GamepadId) -> Vec<Binding> {
        let gamepad = self.gilrs.gamepad(id);
        let has_hat = gamepad.axis_code(Axis::DPadX).is_some();
        let mut bindings = Vec::new();

        for output in LogicalButton::ALL {
            let code = gilrs_button_of(output).and_then(|b| gamepad.button_code(b));
            let dpad_mask = match output {
                LogicalButton::DpadUp => Some(hat_mask::UP),
                LogicalButton::DpadDown => Some(hat_mask::DOWN),
                LogicalButton::DpadLeft => Some(hat_mask::LEFT),
                LogicalButton::DpadRight => Some(hat_mask::RIGHT),
                _ => None,
            };

            let input = match (code, dpad_mask.filter(|_| has_hat)) {
                (Some(code), _) => BindingInput::Button(self.table.button_index(code)),
                (None, Some(mask)) => BindingInput::Hat { hat: 0, mask },
                (None, None) => continue,
            };
            bindings.push(Binding { input, output: BindingOutput::Button(output) });
        }

        for output in LogicalAxis::ALL {
            let axis_code = gamepad.axis_code(gilrs_axis_of(output));
            let button_code = trigger_button_of(output).and_then(|b| gamepad.button_code(b));

            let input = match (axis_code, button_code) {
                (Some(code), _) => BindingInput::Axis(self.table.axis_index(code)),
                (None, Some(code)) => BindingInput::Button(self.table.button_index(code)),
                (None, None) => continue,
            };
            bindings.push(Binding { input, output: BindingOutput::Axis(output) });
        }

        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_positions_round_trip() {
        for button in [Button::South, Button::East, Button::Mode, Button::DPadLeft, Button::Z] {
            let logical = logical_button_of(button).unwrap();
            assert_eq!(gilrs_button_of(logical), Some(button));
        }
        assert_eq!(logical_button_of(Button::LeftTrigger2), None);
        assert_eq!(gilrs_button_of(LogicalButton::Touchpad), None);
    }

    #[test]
    fn test_stick_y_is_flipped() {
        assert_eq!(to_device_value(LogicalAxis::LeftY, 1.0), -32767);
        assert_eq!(to_device_value(LogicalAxis::LeftX, 1.0), 32767);
        assert_eq!(to_device_value(LogicalAxis::RightTrigger, 0.5), 16383);
    }

    #[test]
    fn test_dpad_to_hat() {
        assert_eq!(hat_from_dpad(0.0, 0.0), hat_mask::CENTERED);
        assert_eq!(hat_from_dpad(0.0, 1.0), hat_mask::UP);
        assert_eq!(hat_from_dpad(-1.0, -1.0), hat_mask::LEFT_DOWN);
        assert_eq!(hat_from_dpad(1.0, 1.0), hat_mask::RIGHT_UP);
    }

    #[test]
    fn test_kind_from_usb_ids() {
        assert_eq!(kind_of(Some(0x045e), Some(0x028e)), GamepadKind::Xbox360);
        assert_eq!(kind_of(Some(0x054c), Some(0x0ce6)), GamepadKind::Ps5);
        assert_eq!(kind_of(Some(0x057e), Some(0x2009)), GamepadKind::SwitchPro);
        assert_eq!(kind_of(None, None), GamepadKind::Standard);
    }
}
