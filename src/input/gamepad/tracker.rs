//! Per-device edge tracking
//!
//! Each device keeps one [`SlotFlags`] per unified slot. The level flag follows
//! the input across frames; the two edge flags only describe what happened
//! during the current poll cycle and are wiped by [`EventTracker::begin_cycle`].

use super::index::{decode_hat_mask, raw_hat_slot, HatDirection, Slot, SLOT_COUNT};
use serde::Serialize;

/// Tri-state flags of a single slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotFlags {
    /// Input is currently held (persists across cycles)
    pub level: bool,
    /// Input went down during this cycle
    pub just_pressed: bool,
    /// Input went up during this cycle
    pub just_released: bool,
}

impl SlotFlags {
    fn press(&mut self) {
        self.level = true;
        self.just_pressed = true;
        self.just_released = false;
    }

    fn release(&mut self) {
        self.level = false;
        self.just_released = true;
        self.just_pressed = false;
    }

    fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// A level change produced by an analog or hat event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub slot: Slot,
    pub down: bool,
}

/// Flat table of slot flags for one device
#[derive(Debug, Clone)]
pub struct EventTracker {
    slots: Vec<SlotFlags>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self {
            slots: vec![SlotFlags::default(); SLOT_COUNT],
        }
    }

    /// Drop last cycle's edges, keep levels
    pub fn begin_cycle(&mut self) {
        for flags in &mut self.slots {
            flags.clear_edges();
        }
    }

    /// Record a press or release on one slot
    ///
    /// Within a cycle the last call wins: a press followed by a release leaves
    /// only `just_released` set, and the other way around.
    pub fn apply_button_edge(&mut self, slot: Slot, down: bool) {
        let flags = &mut self.slots[slot.index()];
        if down {
            flags.press();
        } else {
            flags.release();
        }
    }

    /// Apply the same edge to a slot and every slot that mirrors it
    pub fn apply_mirrored_edge(&mut self, slot: Slot, down: bool, mirrors: &[Slot]) {
        self.apply_button_edge(slot, down);
        for mirror in mirrors {
            self.apply_button_edge(*mirror, down);
        }
    }

    /// Treat a post-curve axis value as a button
    ///
    /// Nonzero means held. Only a change of level raises an edge, so a stick
    /// that keeps moving away from center produces a single press.
    pub fn apply_axis_edge(&mut self, slot: Slot, value: f64) -> Option<Transition> {
        let down = value != 0.0;
        if self.slots[slot.index()].level == down {
            return None;
        }

        self.apply_button_edge(slot, down);
        Some(Transition { slot, down })
    }

    /// Update the four direction slots of one hat from its new mask
    ///
    /// All four directions are compared at once so that moving from one
    /// diagonal to another releases exactly the directions that were left.
    pub fn apply_hat_edge(&mut self, hat: usize, mask: u8) -> Vec<Transition> {
        let active = decode_hat_mask(mask);
        let mut transitions = Vec::new();

        for direction in HatDirection::ALL {
            let Some(slot) = raw_hat_slot(hat, direction) else {
                return transitions;
            };

            let down = active.contains(&direction);
            if self.slots[slot.index()].level != down {
                self.apply_button_edge(slot, down);
                transitions.push(Transition { slot, down });
            }
        }

        transitions
    }

    pub fn flags(&self, slot: Slot) -> SlotFlags {
        self.slots[slot.index()]
    }

    pub fn level(&self, slot: Slot) -> bool {
        self.slots[slot.index()].level
    }

    pub fn just_pressed(&self, slot: Slot) -> bool {
        self.slots[slot.index()].just_pressed
    }

    pub fn just_released(&self, slot: Slot) -> bool {
        self.slots[slot.index()].just_released
    }

    /// Slots whose flags match `predicate`, in index order
    pub fn slots_where(&self, predicate: impl Fn(&SlotFlags) -> bool) -> Vec<Slot> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, flags)| predicate(flags))
            .filter_map(|(index, _)| Slot::new(index))
            .collect()
    }
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::index::{hat_mask, raw_button_slot, ANY_BUTTON, ANY_INPUT};
    use proptest::prelude::*;

    fn slot(index: usize) -> Slot {
        Slot::new(index).unwrap()
    }

    #[test]
    fn test_press_then_next_cycle_keeps_level() {
        let mut tracker = EventTracker::new();
        tracker.apply_button_edge(slot(3), true);

        assert!(tracker.just_pressed(slot(3)));
        assert!(tracker.level(slot(3)));
        assert!(!tracker.just_released(slot(3)));

        tracker.begin_cycle();
        assert!(!tracker.just_pressed(slot(3)));
        assert!(tracker.level(slot(3)));
    }

    #[test]
    fn test_last_event_in_cycle_wins() {
        let mut tracker = EventTracker::new();

        tracker.apply_button_edge(slot(5), true);
        tracker.apply_button_edge(slot(5), false);
        assert_eq!(
            tracker.flags(slot(5)),
            SlotFlags { level: false, just_pressed: false, just_released: true }
        );

        tracker.begin_cycle();
        tracker.apply_button_edge(slot(5), false);
        tracker.apply_button_edge(slot(5), true);
        assert_eq!(
            tracker.flags(slot(5)),
            SlotFlags { level: true, just_pressed: true, just_released: false }
        );
    }

    #[test]
    fn test_axis_edge_suppression() {
        let mut tracker = EventTracker::new();
        let axis = slot(60);

        assert_eq!(tracker.apply_axis_edge(axis, 0.8), Some(Transition { slot: axis, down: true }));
        assert_eq!(tracker.apply_axis_edge(axis, 0.8), None);
        assert!(tracker.just_pressed(axis));

        tracker.begin_cycle();
        assert_eq!(tracker.apply_axis_edge(axis, 0.3), None);
        assert!(!tracker.just_pressed(axis));

        assert_eq!(tracker.apply_axis_edge(axis, 0.0), Some(Transition { slot: axis, down: false }));
        assert!(tracker.just_released(axis));
        assert!(!tracker.level(axis));
    }

    #[test]
    fn test_hat_diagonal_transitions() {
        let mut tracker = EventTracker::new();
        let up = raw_hat_slot(0, HatDirection::Up).unwrap();
        let left = raw_hat_slot(0, HatDirection::Left).unwrap();
        let right = raw_hat_slot(0, HatDirection::Right).unwrap();

        let changes = tracker.apply_hat_edge(0, hat_mask::LEFT_UP);
        assert_eq!(changes.len(), 2);
        assert!(tracker.level(up) && tracker.level(left));

        tracker.begin_cycle();
        let changes = tracker.apply_hat_edge(0, hat_mask::RIGHT_UP);
        // Up stays held, left goes up, right goes down
        assert_eq!(
            changes,
            vec![Transition { slot: left, down: false }, Transition { slot: right, down: true }]
        );
        assert!(tracker.level(up));
        assert!(!tracker.just_pressed(up));
        assert!(tracker.just_released(left));
        assert!(tracker.just_pressed(right));

        tracker.begin_cycle();
        let changes = tracker.apply_hat_edge(0, hat_mask::CENTERED);
        assert_eq!(changes.len(), 2);
        assert!(!tracker.level(up) && !tracker.level(right));
    }

    #[test]
    fn test_hat_out_of_range_is_ignored() {
        let mut tracker = EventTracker::new();
        assert!(tracker.apply_hat_edge(5, hat_mask::UP).is_empty());
        assert!(tracker.slots_where(|f| f.level).is_empty());
    }

    #[test]
    fn test_mirrored_edge() {
        let mut tracker = EventTracker::new();
        let button = raw_button_slot(7).unwrap();
        tracker.apply_mirrored_edge(button, true, &[ANY_BUTTON, ANY_INPUT]);

        assert_eq!(tracker.slots_where(|f| f.just_pressed), vec![button, ANY_BUTTON, ANY_INPUT]);
    }

    proptest! {
        #[test]
        fn prop_edges_never_both_set(
            events in prop::collection::vec((0usize..SLOT_COUNT, any::<bool>(), -1.0f64..=1.0, 0u8..16), 0..64)
        ) {
            let mut tracker = EventTracker::new();
            for (index, down, value, mask) in events {
                let s = slot(index);
                match index % 3 {
                    0 => tracker.apply_button_edge(s, down),
                    1 => { tracker.apply_axis_edge(s, value); }
                    _ => { tracker.apply_hat_edge(index % 6, mask); }
                }
            }

            prop_assert!(tracker.slots_where(|f| f.just_pressed && f.just_released).is_empty());
            prop_assert!(tracker.slots_where(|f| f.just_pressed && !f.level).is_empty());
        }
    }
}
