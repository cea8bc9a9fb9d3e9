// Host gamepad source
//
// Maps gamepad buttons onto calculator keys so a controller can stand in for
// the calculator keyboard. Gamepad support is optional: if the backend cannot
// start, the handler stays inert.

use super::{Key, Keyboard, KeyboardState};
use gilrs::{Button as GilrsButton, Event, EventType, Gilrs};
use std::collections::HashSet;

/// Calculator key for a gamepad button
///
/// # Default Mappings (Standard Gamepad Layout)
/// - D-pad: arrow keys
/// - East (B/Circle): Back, which drives the A button
/// - South (A/Cross): OK, which drives the B button
/// - Select / Start: Shift / Backspace
/// - Shoulder triggers: Minus / Plus (scale mode)
/// - Mode: Toolbox (save)
pub fn gamepad_key(button: GilrsButton) -> Option<Key> {
    let key = match button {
        GilrsButton::DPadUp => Key::Up,
        GilrsButton::DPadDown => Key::Down,
        GilrsButton::DPadLeft => Key::Left,
        GilrsButton::DPadRight => Key::Right,
        GilrsButton::East => Key::Back,
        GilrsButton::South => Key::Ok,
        GilrsButton::Select => Key::Shift,
        GilrsButton::Start => Key::Backspace,
        GilrsButton::LeftTrigger => Key::Minus,
        GilrsButton::RightTrigger => Key::Plus,
        GilrsButton::Mode => Key::Toolbox,
        _ => return None,
    };
    Some(key)
}

/// Gamepad input handler
pub struct GamepadHandler {
    gilrs: Option<Gilrs>,
    pressed_keys: HashSet<Key>,
}

impl GamepadHandler {
    /// Start the gamepad backend
    ///
    /// A backend failure is logged and leaves the handler without gamepads.
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                for (_id, gamepad) in gilrs.gamepads() {
                    log::info!("Gamepad connected: {}", gamepad.name());
                }
                Some(gilrs)
            }
            Err(e) => {
                log::warn!("Gamepad support unavailable: {}", e);
                None
            }
        };

        Self {
            gilrs,
            pressed_keys: HashSet::new(),
        }
    }

    /// Handler with no backend
    pub fn disabled() -> Self {
        Self {
            gilrs: None,
            pressed_keys: HashSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.gilrs.is_some()
    }

    /// Drain pending gamepad events
    pub fn update(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };

        while let Some(Event { event, .. }) = gilrs.next_event() {
            match event {
                EventType::ButtonPressed(button, _) => {
                    if let Some(key) = gamepad_key(button) {
                        self.pressed_keys.insert(key);
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(key) = gamepad_key(button) {
                        self.pressed_keys.remove(&key);
                    }
                }
                EventType::Connected => log::info!("Gamepad connected"),
                EventType::Disconnected => {
                    log::info!("Gamepad disconnected");
                    self.pressed_keys.clear();
                }
                _ => {}
            }
        }
    }
}

impl Default for GamepadHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard for GamepadHandler {
    fn scan(&mut self) -> KeyboardState {
        self.update();
        KeyboardState::from_keys(self.pressed_keys.iter().copied())
    }
}
