// Host keyboard source
//
// Maps physical keys of the desktop keyboard onto calculator keys and keeps
// the set of keys currently held.

use super::{Key, Keyboard, KeyboardState};
use std::collections::HashSet;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Calculator key for a desktop key
///
/// # Default Bindings
/// - Arrow keys: arrow keys
/// - Enter: OK, Escape: Back, Home: Home, End: On/Off
/// - Shift: Shift, Alt / Ctrl: Alpha
/// - Backspace: Backspace, Tab: Toolbox
/// - Digits (row or keypad): digits
/// - Keypad + - * /: arithmetic keys, keypad Enter: EXE
pub fn host_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Enter => Key::Ok,
        KeyCode::Escape => Key::Back,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::OnOff,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::AltLeft | KeyCode::AltRight | KeyCode::ControlLeft | KeyCode::ControlRight => {
            Key::Alpha
        }
        KeyCode::KeyX => Key::Xnt,
        KeyCode::KeyV => Key::Var,
        KeyCode::Tab => Key::Toolbox,
        KeyCode::Backspace | KeyCode::Delete => Key::Backspace,
        KeyCode::KeyE => Key::Exp,
        KeyCode::KeyN => Key::Ln,
        KeyCode::KeyL => Key::Log,
        KeyCode::KeyI => Key::Imaginary,
        KeyCode::Comma => Key::Comma,
        KeyCode::Backquote => Key::Power,
        KeyCode::KeyS => Key::Sine,
        KeyCode::KeyC => Key::Cosine,
        KeyCode::KeyT => Key::Tangent,
        KeyCode::KeyP => Key::Pi,
        KeyCode::KeyR => Key::Sqrt,
        KeyCode::KeyQ => Key::Square,
        KeyCode::BracketLeft => Key::LeftParenthesis,
        KeyCode::BracketRight => Key::RightParenthesis,
        KeyCode::Digit0 | KeyCode::Numpad0 => Key::Zero,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::One,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Two,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Three,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Four,
        KeyCode::Digit5 | KeyCode::Numpad5 => Key::Five,
        KeyCode::Digit6 | KeyCode::Numpad6 => Key::Six,
        KeyCode::Digit7 | KeyCode::Numpad7 => Key::Seven,
        KeyCode::Digit8 | KeyCode::Numpad8 => Key::Eight,
        KeyCode::Digit9 | KeyCode::Numpad9 => Key::Nine,
        KeyCode::NumpadAdd | KeyCode::Equal => Key::Plus,
        KeyCode::NumpadSubtract | KeyCode::Minus => Key::Minus,
        KeyCode::NumpadMultiply => Key::Multiplication,
        KeyCode::NumpadDivide | KeyCode::Slash => Key::Division,
        KeyCode::Period | KeyCode::NumpadDecimal => Key::Dot,
        KeyCode::KeyK => Key::Ee,
        KeyCode::KeyA => Key::Ans,
        KeyCode::NumpadEnter => Key::Exe,
        _ => return None,
    };
    Some(key)
}

/// Keyboard input handler
///
/// Fed by window key events; scanned once per frame.
#[derive(Debug, Default)]
pub struct KeyboardHandler {
    /// Calculator keys currently held
    pressed_keys: HashSet<Key>,
}

impl KeyboardHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press event
    pub fn handle_key_press(&mut self, physical_key: PhysicalKey) {
        if let Some(key) = Self::translate(physical_key) {
            self.pressed_keys.insert(key);
        }
    }

    /// Handle a key release event
    pub fn handle_key_release(&mut self, physical_key: PhysicalKey) {
        if let Some(key) = Self::translate(physical_key) {
            self.pressed_keys.remove(&key);
        }
    }

    /// Forget every held key (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
    }

    fn translate(physical_key: PhysicalKey) -> Option<Key> {
        match physical_key {
            PhysicalKey::Code(code) => host_key(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

impl Keyboard for KeyboardHandler {
    fn scan(&mut self) -> KeyboardState {
        KeyboardState::from_keys(self.pressed_keys.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_key_bindings() {
        assert_eq!(host_key(KeyCode::Enter), Some(Key::Ok));
        assert_eq!(host_key(KeyCode::Escape), Some(Key::Back));
        assert_eq!(host_key(KeyCode::Numpad7), Some(Key::Seven));
        assert_eq!(host_key(KeyCode::Digit7), Some(Key::Seven));
        assert_eq!(host_key(KeyCode::F12), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut handler = KeyboardHandler::new();
        handler.handle_key_press(PhysicalKey::Code(KeyCode::ArrowUp));
        handler.handle_key_press(PhysicalKey::Code(KeyCode::Tab));

        let state = handler.scan();
        assert!(state.is_down(Key::Up));
        assert!(state.is_down(Key::Toolbox));

        handler.handle_key_release(PhysicalKey::Code(KeyCode::ArrowUp));
        let state = handler.scan();
        assert!(!state.is_down(Key::Up));
        assert!(state.is_down(Key::Toolbox));

        handler.release_all();
        assert!(handler.scan().is_empty());
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let mut handler = KeyboardHandler::new();
        handler.handle_key_press(PhysicalKey::Code(KeyCode::F1));
        assert!(handler.scan().is_empty());
    }
}
