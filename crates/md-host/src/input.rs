//! Physical-key to controller-button translation.
//!
//! Key codes are opaque `u32` values owned by whatever input shell
//! feeds the host (see `md-runner` for the winit space). The host only
//! matches them against bindings; unmapped codes fall through.

use std::collections::VecDeque;

/// Pad bit state with every button released. Controller bits are
/// active-low: a pressed button clears its bit.
pub const PAD_RELEASED: u16 = 0x0FFF;

/// Logical buttons of a 6-button controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    B,
    C,
    A,
    Start,
    Z,
    Y,
    X,
    Mode,
}

impl Button {
    /// All logical buttons, in pad-bit order.
    pub const ALL: [Self; 12] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::B,
        Self::C,
        Self::A,
        Self::Start,
        Self::Z,
        Self::Y,
        Self::X,
        Self::Mode,
    ];

    /// Bit for this button in the pad state word.
    #[must_use]
    pub const fn mask(self) -> u16 {
        match self {
            Self::Up => 0x0001,
            Self::Down => 0x0002,
            Self::Left => 0x0004,
            Self::Right => 0x0008,
            Self::B => 0x0010,
            Self::C => 0x0020,
            Self::A => 0x0040,
            Self::Start => 0x0080,
            Self::Z => 0x0100,
            Self::Y => 0x0200,
            Self::X => 0x0400,
            Self::Mode => 0x0800,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

struct KeyEvent {
    key: u32,
    pressed: bool,
}

/// Binding table plus the queue of not-yet-applied key events.
///
/// One binding per logical button, last write wins. Events are queued
/// as they arrive from the input shell and drained once per scheduler
/// update into the pad bit state.
pub struct InputMap {
    bindings: [Option<u32>; Button::ALL.len()],
    pending: VecDeque<KeyEvent>,
}

impl InputMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: [None; Button::ALL.len()],
            pending: VecDeque::new(),
        }
    }

    /// Bind a physical key code to a logical button, replacing any
    /// previous binding for that button.
    pub fn set_mapping(&mut self, button: Button, key: u32) {
        self.bindings[button.index()] = Some(key);
    }

    /// Current binding for a logical button.
    #[must_use]
    pub fn mapping(&self, button: Button) -> Option<u32> {
        self.bindings[button.index()]
    }

    /// Queue a physical key transition for the next update.
    pub fn push_event(&mut self, key: u32, pressed: bool) {
        self.pending.push_back(KeyEvent { key, pressed });
    }

    /// Apply all queued events to the pad state. Key down clears the
    /// button's bit, key up sets it; unmapped key codes are ignored.
    pub fn drain_into(&mut self, pad: &mut u16) {
        while let Some(event) = self.pending.pop_front() {
            let Some(button) = self.button_for(event.key) else {
                continue;
            };
            if event.pressed {
                *pad &= !button.mask();
            } else {
                *pad |= button.mask();
            }
        }
    }

    fn button_for(&self, key: u32) -> Option<Button> {
        Button::ALL
            .into_iter()
            .find(|button| self.bindings[button.index()] == Some(key))
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_for_every_button() {
        let mut map = InputMap::new();
        for (i, button) in Button::ALL.into_iter().enumerate() {
            let key = 1000 + i as u32;
            map.set_mapping(button, key);
            assert_eq!(map.mapping(button), Some(key));
        }
    }

    #[test]
    fn last_write_wins() {
        let mut map = InputMap::new();
        map.set_mapping(Button::Start, 13);
        map.set_mapping(Button::Start, 27);
        assert_eq!(map.mapping(Button::Start), Some(27));
    }

    #[test]
    fn key_down_clears_bit_key_up_sets_it() {
        let mut map = InputMap::new();
        map.set_mapping(Button::A, 65);
        let mut pad = PAD_RELEASED;

        map.push_event(65, true);
        map.drain_into(&mut pad);
        assert_eq!(pad & Button::A.mask(), 0);

        map.push_event(65, false);
        map.drain_into(&mut pad);
        assert_eq!(pad, PAD_RELEASED);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut map = InputMap::new();
        map.set_mapping(Button::Up, 1);
        let mut pad = PAD_RELEASED;
        map.push_event(99, true);
        map.drain_into(&mut pad);
        assert_eq!(pad, PAD_RELEASED);
    }

    #[test]
    fn masks_cover_distinct_bits() {
        let mut seen = 0u16;
        for button in Button::ALL {
            assert_eq!(seen & button.mask(), 0);
            seen |= button.mask();
        }
        assert_eq!(seen, PAD_RELEASED);
    }
}
