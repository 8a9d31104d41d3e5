//! The concrete physical key-code space fed to the host.
//!
//! The host treats key codes as opaque `u32` values; this module owns
//! their meaning on the winit side. Codes are stable across runs so
//! saved binding configurations stay valid.

use md_host::{Button, Host};
use winit::keyboard::KeyCode;

pub const ARROW_UP: u32 = 1;
pub const ARROW_DOWN: u32 = 2;
pub const ARROW_LEFT: u32 = 3;
pub const ARROW_RIGHT: u32 = 4;
pub const ENTER: u32 = 5;
pub const SPACE: u32 = 6;
pub const TAB: u32 = 7;
pub const BACKSPACE: u32 = 8;

/// Letters A-Z occupy 10..=35.
pub const KEY_A: u32 = 10;
pub const KEY_B: u32 = 11;
pub const KEY_C: u32 = 12;
pub const KEY_D: u32 = 13;
pub const KEY_E: u32 = 14;
pub const KEY_F: u32 = 15;
pub const KEY_G: u32 = 16;
pub const KEY_H: u32 = 17;
pub const KEY_I: u32 = 18;
pub const KEY_J: u32 = 19;
pub const KEY_K: u32 = 20;
pub const KEY_L: u32 = 21;
pub const KEY_M: u32 = 22;
pub const KEY_N: u32 = 23;
pub const KEY_O: u32 = 24;
pub const KEY_P: u32 = 25;
pub const KEY_Q: u32 = 26;
pub const KEY_R: u32 = 27;
pub const KEY_S: u32 = 28;
pub const KEY_T: u32 = 29;
pub const KEY_U: u32 = 30;
pub const KEY_V: u32 = 31;
pub const KEY_W: u32 = 32;
pub const KEY_X: u32 = 33;
pub const KEY_Y: u32 = 34;
pub const KEY_Z: u32 = 35;

/// Digits 0-9 occupy 36..=45.
pub const DIGIT_0: u32 = 36;

/// Convert a winit key code to the host's opaque code space.
///
/// Keys outside the table have no code and are never forwarded.
#[must_use]
pub fn from_winit(key: KeyCode) -> Option<u32> {
    match key {
        KeyCode::ArrowUp => Some(ARROW_UP),
        KeyCode::ArrowDown => Some(ARROW_DOWN),
        KeyCode::ArrowLeft => Some(ARROW_LEFT),
        KeyCode::ArrowRight => Some(ARROW_RIGHT),
        KeyCode::Enter => Some(ENTER),
        KeyCode::Space => Some(SPACE),
        KeyCode::Tab => Some(TAB),
        KeyCode::Backspace => Some(BACKSPACE),

        KeyCode::KeyA => Some(KEY_A),
        KeyCode::KeyB => Some(KEY_B),
        KeyCode::KeyC => Some(KEY_C),
        KeyCode::KeyD => Some(KEY_D),
        KeyCode::KeyE => Some(KEY_E),
        KeyCode::KeyF => Some(KEY_F),
        KeyCode::KeyG => Some(KEY_G),
        KeyCode::KeyH => Some(KEY_H),
        KeyCode::KeyI => Some(KEY_I),
        KeyCode::KeyJ => Some(KEY_J),
        KeyCode::KeyK => Some(KEY_K),
        KeyCode::KeyL => Some(KEY_L),
        KeyCode::KeyM => Some(KEY_M),
        KeyCode::KeyN => Some(KEY_N),
        KeyCode::KeyO => Some(KEY_O),
        KeyCode::KeyP => Some(KEY_P),
        KeyCode::KeyQ => Some(KEY_Q),
        KeyCode::KeyR => Some(KEY_R),
        KeyCode::KeyS => Some(KEY_S),
        KeyCode::KeyT => Some(KEY_T),
        KeyCode::KeyU => Some(KEY_U),
        KeyCode::KeyV => Some(KEY_V),
        KeyCode::KeyW => Some(KEY_W),
        KeyCode::KeyX => Some(KEY_X),
        KeyCode::KeyY => Some(KEY_Y),
        KeyCode::KeyZ => Some(KEY_Z),

        KeyCode::Digit0 => Some(DIGIT_0),
        KeyCode::Digit1 => Some(DIGIT_0 + 1),
        KeyCode::Digit2 => Some(DIGIT_0 + 2),
        KeyCode::Digit3 => Some(DIGIT_0 + 3),
        KeyCode::Digit4 => Some(DIGIT_0 + 4),
        KeyCode::Digit5 => Some(DIGIT_0 + 5),
        KeyCode::Digit6 => Some(DIGIT_0 + 6),
        KeyCode::Digit7 => Some(DIGIT_0 + 7),
        KeyCode::Digit8 => Some(DIGIT_0 + 8),
        KeyCode::Digit9 => Some(DIGIT_0 + 9),

        _ => None,
    }
}

/// Stock bindings: arrows for directions, A/S/D for the A/B/C face
/// buttons, Q/W/E for X/Y/Z, Enter for Start and Tab for Mode.
#[must_use]
pub fn default_bindings() -> [(Button, u32); 12] {
    [
        (Button::Up, ARROW_UP),
        (Button::Down, ARROW_DOWN),
        (Button::Left, ARROW_LEFT),
        (Button::Right, ARROW_RIGHT),
        (Button::A, KEY_A),
        (Button::B, KEY_S),
        (Button::C, KEY_D),
        (Button::X, KEY_Q),
        (Button::Y, KEY_W),
        (Button::Z, KEY_E),
        (Button::Start, ENTER),
        (Button::Mode, TAB),
    ]
}

/// Install the stock bindings on a host.
pub fn install_default_bindings(host: &mut Host) {
    for (button, key) in default_bindings() {
        host.set_input_mapping(button, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for (_, code) in default_bindings() {
            assert!(seen.insert(code));
        }
    }

    #[test]
    fn every_button_gets_a_default() {
        let bindings = default_bindings();
        for button in Button::ALL {
            assert!(bindings.iter().any(|(b, _)| *b == button));
        }
    }

    #[test]
    fn winit_letters_map_into_the_letter_block() {
        assert_eq!(from_winit(KeyCode::KeyA), Some(KEY_A));
        assert_eq!(from_winit(KeyCode::KeyZ), Some(KEY_Z));
        assert_eq!(from_winit(KeyCode::F1), None);
    }
}
