//! Tests for the gamepad hub

use super::*;
use crate::input::gamepad::index::{
    hat_mask, logical_axis_slot, logical_button_slot, raw_axis_slot, raw_button_slot,
    raw_hat_slot, HatDirection, LogicalAxis, LogicalButton, ANY_AXIS, ANY_BUTTON, ANY_INPUT,
    SLOT_COUNT,
};
use crate::input::gamepad::layer::{GamepadKind, HardwareEvent, LayerError};
use crate::input::gamepad::virtual_layer::{VirtualDevice, VirtualLayer};

const PAD: HardwareId = HardwareId(1);
const STICK: HardwareId = HardwareId(2);

/// 0.8 of full scale
const AXIS_0_8: i16 = 26214;

fn make_hub(devices: Vec<(HardwareId, VirtualDevice)>) -> GamepadHub<VirtualLayer> {
    let mut layer = VirtualLayer::new();
    for (id, device) in devices {
        layer.attach(id, device);
    }
    GamepadHub::new(layer, ResponseDefaults::default())
}

fn pad_hub() -> GamepadHub<VirtualLayer> {
    let mut hub = make_hub(vec![(PAD, VirtualDevice::standard_gamepad("Pad"))]);
    assert!(hub.poll_once().unwrap());
    hub
}

fn stick_hub() -> GamepadHub<VirtualLayer> {
    let mut hub = make_hub(vec![(STICK, VirtualDevice::joystick("Stick"))]);
    assert!(hub.poll_once().unwrap());
    hub
}

fn push(hub: &mut GamepadHub<VirtualLayer>, event: HardwareEvent) {
    hub.layer_mut().push_event(event);
}

fn pad_button(button: LogicalButton, down: bool) -> HardwareEvent {
    HardwareEvent::GamepadButton { which: PAD, button, down }
}

fn pad_axis(axis: LogicalAxis, value: i16) -> HardwareEvent {
    HardwareEvent::GamepadAxis { which: PAD, axis, value }
}

fn idx(slot: Option<Slot>) -> usize {
    slot.unwrap().index()
}

#[test]
fn test_end_to_end_raw_button() {
    let mut hub = make_hub(vec![]);
    assert!(!hub.poll_once().unwrap());
    assert_eq!(hub.device_count(), 0);

    hub.layer_mut().attach(STICK, VirtualDevice::joystick("Stick"));
    assert!(hub.poll_once().unwrap());
    assert_eq!(hub.device_count(), 1);

    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 3, down: true });
    assert!(!hub.poll_once().unwrap());

    assert!(hub.just_pressed(0, 3).unwrap());
    assert!(hub.level(0, 3).unwrap());
    assert!(!hub.just_released(0, 3).unwrap());
    // Raw-only devices drive the wildcards from raw buttons
    assert!(hub.just_pressed(0, ANY_BUTTON.index()).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());

    assert!(!hub.poll_once().unwrap());
    assert!(!hub.just_pressed(0, 3).unwrap());
    assert!(hub.level(0, 3).unwrap());
}

#[test]
fn test_queries_are_stable_between_polls() {
    let mut hub = pad_hub();
    push(&mut hub, pad_button(LogicalButton::North, true));
    hub.poll_once().unwrap();

    let slot = logical_button_slot(LogicalButton::North).index();
    let first = hub.flags(0, slot).unwrap();
    for _ in 0..3 {
        assert_eq!(hub.flags(0, slot).unwrap(), first);
    }
    assert!(first.just_pressed);
}

#[test]
fn test_same_cycle_press_release_leaves_release() {
    let mut hub = stick_hub();
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 1, down: true });
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 1, down: false });
    hub.poll_once().unwrap();

    let flags = hub.flags(0, 1).unwrap();
    assert!(!flags.level);
    assert!(!flags.just_pressed);
    assert!(flags.just_released);

    let device = hub.device(0).unwrap();
    assert!(device.tracker().slots_where(|f| f.just_pressed && f.just_released).is_empty());
}

#[test]
fn test_same_cycle_release_press_leaves_press() {
    let mut hub = stick_hub();
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 1, down: true });
    hub.poll_once().unwrap();

    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 1, down: false });
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 1, down: true });
    hub.poll_once().unwrap();

    let flags = hub.flags(0, 1).unwrap();
    assert!(flags.level);
    assert!(flags.just_pressed);
    assert!(!flags.just_released);
}

#[test]
fn test_detach_compacts_indices() {
    let ids: Vec<HardwareId> = (10..14).map(HardwareId).collect();
    let mut hub = make_hub(
        ids.iter()
            .map(|id| (*id, VirtualDevice::joystick(&format!("Stick {}", id))))
            .collect(),
    );
    assert!(hub.poll_once().unwrap());
    assert_eq!(hub.device_count(), 4);

    hub.layer_mut().detach(HardwareId(11));
    assert!(hub.poll_once().unwrap());

    assert_eq!(hub.device_count(), 3);
    assert_eq!(hub.stable_id(0).unwrap(), HardwareId(10));
    assert_eq!(hub.stable_id(1).unwrap(), HardwareId(12));
    assert_eq!(hub.stable_id(2).unwrap(), HardwareId(13));
    assert_eq!(hub.description(1).unwrap(), "Stick 12");
    assert_eq!(hub.layer().open_handle_count(HardwareId(11)), 0);
}

#[test]
fn test_logical_button_mirrors_wildcards_and_raw() {
    let mut hub = pad_hub();
    push(&mut hub, pad_button(LogicalButton::South, true));
    hub.poll_once().unwrap();

    let south = logical_button_slot(LogicalButton::South).index();
    assert!(hub.just_pressed(0, south).unwrap());
    assert!(hub.just_pressed(0, ANY_BUTTON.index()).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());
    assert!(hub.just_pressed(0, idx(raw_button_slot(0))).unwrap());
    assert!(!hub.just_pressed(0, ANY_AXIS.index()).unwrap());

    push(&mut hub, pad_button(LogicalButton::South, false));
    hub.poll_once().unwrap();
    assert!(hub.just_released(0, south).unwrap());
    assert!(hub.just_released(0, idx(raw_button_slot(0))).unwrap());
    assert!(!hub.level(0, ANY_INPUT.index()).unwrap());
}

#[test]
fn test_dpad_mirrors_to_bound_hat_direction() {
    let mut hub = pad_hub();
    push(&mut hub, pad_button(LogicalButton::DpadLeft, true));
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, idx(raw_hat_slot(0, HatDirection::Left))).unwrap());
    assert!(!hub.level(0, idx(raw_hat_slot(0, HatDirection::Up))).unwrap());
}

#[test]
fn test_axis_edge_suppression() {
    let mut hub = pad_hub();
    let left_x = logical_axis_slot(LogicalAxis::LeftX).index();

    push(&mut hub, pad_axis(LogicalAxis::LeftX, AXIS_0_8));
    push(&mut hub, pad_axis(LogicalAxis::LeftX, AXIS_0_8));
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, left_x).unwrap());
    assert!(hub.level(0, left_x).unwrap());
    assert!(hub.just_pressed(0, ANY_AXIS.index()).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());
    assert!(hub.level(0, idx(raw_axis_slot(0))).unwrap());
    assert!(!hub.level(0, ANY_BUTTON.index()).unwrap());

    // Still deflected: no new edge
    push(&mut hub, pad_axis(LogicalAxis::LeftX, AXIS_0_8 / 2));
    hub.poll_once().unwrap();
    assert!(!hub.just_pressed(0, left_x).unwrap());
    assert!(hub.level(0, left_x).unwrap());

    push(&mut hub, pad_axis(LogicalAxis::LeftX, 0));
    hub.poll_once().unwrap();
    assert!(hub.just_released(0, left_x).unwrap());
    assert!(hub.just_released(0, ANY_AXIS.index()).unwrap());
    assert!(!hub.level(0, idx(raw_axis_slot(0))).unwrap());
}

#[test]
fn test_trigger_uses_threshold_not_deadzone() {
    let mut hub = pad_hub();
    hub.set_deadzone(0, 0.0).unwrap();
    hub.set_threshold(0, 0.5).unwrap();

    let trigger = logical_axis_slot(LogicalAxis::LeftTrigger).index();
    let stick = logical_axis_slot(LogicalAxis::RightX).index();

    push(&mut hub, pad_axis(LogicalAxis::LeftTrigger, 9830));
    push(&mut hub, pad_axis(LogicalAxis::RightX, 9830));
    hub.poll_once().unwrap();

    assert!(!hub.level(0, trigger).unwrap());
    assert_eq!(hub.axis_value(0, trigger).unwrap(), 0.0);
    assert!(hub.level(0, stick).unwrap());
    assert!(hub.axis_value(0, stick).unwrap() > 0.29);

    push(&mut hub, pad_axis(LogicalAxis::LeftTrigger, i16::MAX));
    hub.poll_once().unwrap();
    assert!(hub.just_pressed(0, trigger).unwrap());
    assert_eq!(hub.axis_value(0, trigger).unwrap(), 1.0);
}

#[test]
fn test_raw_stick_axis_on_joystick() {
    let mut hub = stick_hub();
    let axis = idx(raw_axis_slot(1));

    push(&mut hub, HardwareEvent::JoystickAxis { which: STICK, axis: 1, value: -AXIS_0_8 });
    push(&mut hub, HardwareEvent::JoystickAxis { which: STICK, axis: 1, value: -AXIS_0_8 });
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, axis).unwrap());
    assert!(hub.just_pressed(0, ANY_AXIS.index()).unwrap());
    assert!(hub.axis_value(0, axis).unwrap() < -0.7);

    // Inside the deadzone counts as centered
    push(&mut hub, HardwareEvent::JoystickAxis { which: STICK, axis: 1, value: 1000 });
    hub.poll_once().unwrap();
    assert!(hub.just_released(0, axis).unwrap());
    assert_eq!(hub.axis_value(0, axis).unwrap(), 0.0);
}

#[test]
fn test_gamepad_ignores_raw_axes_and_hats() {
    let mut hub = pad_hub();
    push(&mut hub, HardwareEvent::JoystickAxis { which: PAD, axis: 0, value: AXIS_0_8 });
    push(&mut hub, HardwareEvent::JoystickHat { which: PAD, hat: 0, mask: hat_mask::UP });
    hub.poll_once().unwrap();

    assert!(!hub.level(0, idx(raw_axis_slot(0))).unwrap());
    assert!(!hub.level(0, idx(raw_hat_slot(0, HatDirection::Up))).unwrap());
    assert!(!hub.level(0, ANY_AXIS.index()).unwrap());
    assert!(!hub.level(0, ANY_INPUT.index()).unwrap());
}

#[test]
fn test_raw_button_on_gamepad_skips_wildcards() {
    let mut hub = pad_hub();
    push(&mut hub, HardwareEvent::JoystickButton { which: PAD, button: 0, down: true });
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, 0).unwrap());
    assert!(!hub.level(0, ANY_BUTTON.index()).unwrap());
    assert!(!hub.level(0, ANY_INPUT.index()).unwrap());
}

#[test]
fn test_hat_on_joystick_mirrors_any_button() {
    let mut hub = stick_hub();
    let up = idx(raw_hat_slot(0, HatDirection::Up));
    let left = idx(raw_hat_slot(0, HatDirection::Left));

    push(&mut hub, HardwareEvent::JoystickHat { which: STICK, hat: 0, mask: hat_mask::LEFT_UP });
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, up).unwrap());
    assert!(hub.just_pressed(0, left).unwrap());
    assert!(hub.just_pressed(0, ANY_BUTTON.index()).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());

    push(&mut hub, HardwareEvent::JoystickHat { which: STICK, hat: 0, mask: hat_mask::UP });
    hub.poll_once().unwrap();
    assert!(hub.just_released(0, left).unwrap());
    assert!(hub.level(0, up).unwrap());
    assert!(!hub.just_pressed(0, up).unwrap());
}

#[test]
fn test_enumeration_failure_leaves_state_untouched() {
    let mut hub = pad_hub();
    let south = logical_button_slot(LogicalButton::South).index();

    push(&mut hub, pad_button(LogicalButton::South, true));
    hub.poll_once().unwrap();
    hub.queue_press(0, 3).unwrap();

    hub.layer_mut().set_enumeration_failure(true);
    push(&mut hub, pad_button(LogicalButton::South, false));

    let err = hub.poll_once().unwrap_err();
    assert!(matches!(err, HubError::Enumeration(LayerError::Enumeration(_))));
    assert_eq!(hub.device_count(), 1);
    assert!(hub.just_pressed(0, south).unwrap());
    assert!(!hub.level(0, 3).unwrap());
    assert_eq!(hub.layer().pending_events(), 1);
    assert_eq!(hub.pending_edges(), 1);

    hub.layer_mut().set_enumeration_failure(false);
    assert!(!hub.poll_once().unwrap());
    assert!(hub.just_released(0, south).unwrap());
    assert!(hub.just_pressed(0, 3).unwrap());
}

#[test]
fn test_open_failure_retried_next_poll() {
    let mut hub = make_hub(vec![(STICK, VirtualDevice::joystick("Stick"))]);
    hub.layer_mut().set_open_failure(STICK, true);

    assert!(!hub.poll_once().unwrap());
    assert_eq!(hub.device_count(), 0);

    hub.layer_mut().set_open_failure(STICK, false);
    assert!(hub.poll_once().unwrap());
    assert_eq!(hub.device_count(), 1);
}

#[test]
fn test_unknown_device_and_out_of_range_events_ignored() {
    let mut hub = stick_hub();
    push(&mut hub, HardwareEvent::JoystickButton { which: HardwareId(99), button: 0, down: true });
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 70, down: true });
    push(&mut hub, HardwareEvent::JoystickAxis { which: STICK, axis: 25, value: AXIS_0_8 });
    push(&mut hub, HardwareEvent::JoystickHat { which: STICK, hat: 9, mask: hat_mask::UP });
    hub.poll_once().unwrap();

    assert_eq!(hub.layer().pending_events(), 0);
    assert!(hub.device(0).unwrap().tracker().slots_where(|f| f.level).is_empty());
}

#[test]
fn test_bounds_are_reported() {
    let hub = stick_hub();

    assert!(matches!(
        hub.level(1, 0),
        Err(HubError::DeviceOutOfRange { index: 1, count: 1 })
    ));
    assert!(matches!(hub.level(0, SLOT_COUNT), Err(HubError::SlotOutOfRange(135))));
    assert!(matches!(hub.axis_value(0, 5), Err(HubError::NotAnAxis(5))));
    assert!(matches!(
        hub.direct_level(0, logical_button_slot(LogicalButton::South).index()),
        Err(HubError::NotAGamepad(0))
    ));
    assert!(matches!(
        hub.axis_value(0, logical_axis_slot(LogicalAxis::LeftX).index()),
        Err(HubError::NotAGamepad(0))
    ));
}

#[test]
fn test_synthetic_press_on_logical_slot() {
    let mut hub = pad_hub();
    let south = logical_button_slot(LogicalButton::South).index();

    hub.queue_press(0, south).unwrap();
    assert!(!hub.just_pressed(0, south).unwrap());

    hub.poll_once().unwrap();
    assert!(hub.just_pressed(0, south).unwrap());
    assert!(hub.just_pressed(0, 0).unwrap());
    assert!(hub.just_pressed(0, ANY_BUTTON.index()).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());

    hub.queue_release(0, south).unwrap();
    hub.poll_once().unwrap();
    assert!(hub.just_released(0, south).unwrap());
    assert!(hub.just_released(0, 0).unwrap());
    assert!(!hub.level(0, ANY_INPUT.index()).unwrap());
}

#[test]
fn test_synthetic_press_on_axis_uses_axis_wildcard() {
    let mut hub = pad_hub();
    hub.queue_press(0, logical_axis_slot(LogicalAxis::LeftTrigger).index()).unwrap();
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, idx(raw_axis_slot(2))).unwrap());
    assert!(hub.just_pressed(0, ANY_AXIS.index()).unwrap());
    assert!(!hub.level(0, ANY_BUTTON.index()).unwrap());
}

#[test]
fn test_synthetic_press_on_raw_slot_only_raises_any_input() {
    let mut hub = stick_hub();
    hub.queue_press(0, 4).unwrap();
    hub.poll_once().unwrap();

    assert!(hub.just_pressed(0, 4).unwrap());
    assert!(hub.just_pressed(0, ANY_INPUT.index()).unwrap());
    assert!(!hub.level(0, ANY_BUTTON.index()).unwrap());
}

#[test]
fn test_synthetic_edge_rules() {
    let mut hub = stick_hub();

    assert!(matches!(hub.queue_press(0, ANY_INPUT.index()), Err(HubError::WildcardSlot(134))));
    assert!(matches!(hub.queue_press(4, 0), Err(HubError::DeviceOutOfRange { .. })));
    assert!(matches!(hub.queue_release(0, 500), Err(HubError::SlotOutOfRange(500))));

    // Applied after hardware events of the same cycle
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 2, down: false });
    hub.queue_press(0, 2).unwrap();
    hub.poll_once().unwrap();
    assert!(hub.just_pressed(0, 2).unwrap());
    assert!(!hub.just_released(0, 2).unwrap());

    // Dropped when the device leaves before the next cycle
    hub.queue_press(0, 1).unwrap();
    hub.layer_mut().detach(STICK);
    assert!(hub.poll_once().unwrap());
    assert_eq!(hub.pending_edges(), 0);
    assert_eq!(hub.device_count(), 0);
}

#[test]
fn test_raw_bound_index() {
    let mut hub = make_hub(vec![
        (PAD, VirtualDevice::standard_gamepad("Pad")),
        (STICK, VirtualDevice::joystick("Stick")),
    ]);
    hub.poll_once().unwrap();

    let bound = |slot: Slot| hub.raw_bound_index(0, slot.index()).unwrap();
    assert_eq!(bound(logical_button_slot(LogicalButton::South)), raw_button_slot(0));
    assert_eq!(
        bound(logical_button_slot(LogicalButton::DpadUp)),
        raw_hat_slot(0, HatDirection::Up)
    );
    assert_eq!(bound(logical_axis_slot(LogicalAxis::RightTrigger)), raw_axis_slot(5));
    assert_eq!(bound(logical_button_slot(LogicalButton::Touchpad)), None);
    assert_eq!(hub.raw_bound_index(0, 3).unwrap(), None);

    let south = logical_button_slot(LogicalButton::South).index();
    assert_eq!(hub.raw_bound_index(1, south).unwrap(), None);
}

#[test]
fn test_direct_level_reads_hardware() {
    let mut hub = make_hub(vec![
        (PAD, VirtualDevice::standard_gamepad("Pad")),
        (STICK, VirtualDevice::joystick("Stick")),
    ]);
    hub.poll_once().unwrap();

    push(&mut hub, pad_button(LogicalButton::Start, true));
    push(&mut hub, HardwareEvent::JoystickHat { which: STICK, hat: 0, mask: hat_mask::RIGHT_DOWN });
    push(&mut hub, HardwareEvent::JoystickButton { which: STICK, button: 5, down: true });

    // Visible before the events are polled
    let start = logical_button_slot(LogicalButton::Start).index();
    assert!(hub.direct_level(0, start).unwrap());
    assert!(!hub.level(0, start).unwrap());

    assert!(hub.direct_level(1, idx(raw_hat_slot(0, HatDirection::Down))).unwrap());
    assert!(hub.direct_level(1, idx(raw_hat_slot(0, HatDirection::Right))).unwrap());
    assert!(!hub.direct_level(1, idx(raw_hat_slot(0, HatDirection::Up))).unwrap());
    assert!(hub.direct_level(1, 5).unwrap());
    assert!(!hub.direct_level(1, idx(raw_axis_slot(0))).unwrap());
}

#[test]
fn test_mapping_upgrades_raw_device() {
    let mut hub = stick_hub();
    let south = logical_button_slot(LogicalButton::South).index();

    assert!(!hub.is_gamepad(0).unwrap());
    assert_eq!(hub.kind(0).unwrap(), GamepadKind::Unknown);
    assert_eq!(hub.mapping(0).unwrap(), None);

    let err = hub.apply_mapping(0, "garbage").unwrap_err();
    assert!(matches!(err, HubError::Layer(LayerError::InvalidMapping(_))));
    assert!(!hub.is_gamepad(0).unwrap());

    let mapping = "03000000000000000000000000000000,Stick,a:b2,leftx:a0";
    hub.apply_mapping(0, mapping).unwrap();
    assert!(hub.is_gamepad(0).unwrap());
    assert_eq!(hub.kind(0).unwrap(), GamepadKind::Standard);
    assert_eq!(hub.mapping(0).unwrap().as_deref(), Some(mapping));
    assert_eq!(hub.raw_bound_index(0, south).unwrap(), raw_button_slot(2));

    push(&mut hub, HardwareEvent::GamepadButton { which: STICK, button: LogicalButton::South, down: true });
    hub.poll_once().unwrap();
    assert!(hub.just_pressed(0, 2).unwrap());
    assert!(hub.just_pressed(0, ANY_BUTTON.index()).unwrap());

    hub.remove_mapping(0).unwrap();
    assert_eq!(hub.raw_bound_index(0, south).unwrap(), None);
}

#[test]
fn test_descriptions_and_passthroughs() {
    let mut hub = make_hub(vec![
        (PAD, VirtualDevice::standard_gamepad("Pad")),
        (STICK, VirtualDevice::joystick("Stick")),
    ]);
    hub.poll_once().unwrap();

    assert_eq!(hub.description(0).unwrap(), "Pad");
    assert_eq!(hub.kind(0).unwrap(), GamepadKind::Xbox360);
    assert_eq!(hub.guid_string(0).unwrap(), "030000005e0400008e02000014010000");
    assert_eq!(hub.guid_string(1).unwrap(), "none");
    assert_eq!(hub.stable_id(1).unwrap(), STICK);
    assert_eq!(hub.button_count(1).unwrap(), 12);
    assert_eq!(hub.axis_count(1).unwrap(), 4);
    assert_eq!(hub.hat_count(1).unwrap(), 1);

    hub.rumble(0, 0.5, 1.0, 0.25).unwrap();
    assert_eq!(hub.layer().device(PAD).unwrap().rumble, Some((32767, 65535, 250)));

    hub.rumble(1, 2.0, -1.0, -4.0).unwrap();
    assert_eq!(hub.layer().device(STICK).unwrap().rumble, Some((65535, 0, 0)));

    hub.set_color(0, 0xFF8000).unwrap();
    assert_eq!(hub.layer().device(PAD).unwrap().led, Some((0x00, 0x80, 0xFF)));

    assert!(matches!(hub.rumble(2, 1.0, 1.0, 1.0), Err(HubError::DeviceOutOfRange { .. })));
}

#[test]
fn test_deadzone_and_threshold_are_clamped() {
    let mut hub = pad_hub();
    hub.set_deadzone(0, 3.0).unwrap();
    hub.set_threshold(0, -2.0).unwrap();

    assert_eq!(hub.deadzone(0).unwrap(), 1.0);
    assert_eq!(hub.threshold(0).unwrap(), 0.0);
    assert!(hub.set_deadzone(1, 0.5).is_err());
}

#[test]
fn test_shutdown_closes_every_handle() {
    let mut hub = make_hub(vec![
        (PAD, VirtualDevice::standard_gamepad("Pad")),
        (STICK, VirtualDevice::joystick("Stick")),
    ]);
    hub.poll_once().unwrap();
    assert_eq!(hub.layer().open_handle_count(PAD), 1);

    hub.shutdown();
    assert_eq!(hub.device_count(), 0);
    assert_eq!(hub.layer().open_handle_count(PAD), 0);
    assert_eq!(hub.layer().open_handle_count(STICK), 0);
}
