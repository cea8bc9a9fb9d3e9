// Input Mapper - Keyboard snapshot to joypad lines and commands
//
// Every frame the whole joypad is recomputed from the current snapshot. Only
// the timing overlay toggle remembers the previous frame, so holding its key
// fires once.

use super::{Key, KeyboardState};
use crate::core::Joypad;
use crate::display::{PaletteKind, ScaleMode};
use std::collections::HashMap;

/// Runtime key map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub a: Vec<Key>,
    pub b: Vec<Key>,
    pub select: Vec<Key>,
    pub start: Vec<Key>,
    pub up: Vec<Key>,
    pub down: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    /// Palette selection keys
    pub palettes: Vec<(Key, PaletteKind)>,
    /// Scale mode selection keys
    pub scale_modes: Vec<(Key, ScaleMode)>,
    pub save: Vec<Key>,
    pub toggle_overlay: Vec<Key>,
    pub suspend: Vec<Key>,
    pub save_and_exit: Vec<Key>,
}

impl Default for KeyMap {
    /// Calculator layout
    ///
    /// - Arrow keys: D-pad
    /// - Back: A, OK: B
    /// - Shift / Home: Select
    /// - Backspace / Alpha / On-Off: Start
    /// - 1-5: palettes
    /// - Plus / Minus / Multiplication: ratio, centered and 2x scaling
    /// - Toolbox: save, 7: timing overlay, 9: suspend, 0: save and exit
    fn default() -> Self {
        KeyMap {
            a: vec![Key::Back],
            b: vec![Key::Ok],
            select: vec![Key::Shift, Key::Home],
            start: vec![Key::Backspace, Key::Alpha, Key::OnOff],
            up: vec![Key::Up],
            down: vec![Key::Down],
            left: vec![Key::Left],
            right: vec![Key::Right],
            palettes: vec![
                (Key::One, PaletteKind::Original),
                (Key::Two, PaletteKind::Gray),
                (Key::Three, PaletteKind::GrayNegative),
                (Key::Four, PaletteKind::Peanut),
                (Key::Five, PaletteKind::VirtualBoy),
            ],
            scale_modes: vec![
                (Key::Plus, ScaleMode::MaximizedRatio),
                (Key::Minus, ScaleMode::Centered),
                (Key::Multiplication, ScaleMode::Maximized2x),
            ],
            save: vec![Key::Toolbox],
            toggle_overlay: vec![Key::Seven],
            suspend: vec![Key::Nine],
            save_and_exit: vec![Key::Zero],
        }
    }
}

impl KeyMap {
    /// Check that no key is bound to more than one action
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashMap<Key, String> = HashMap::new();
        let mut claim = |key: Key, action: String| -> Result<(), String> {
            match seen.get(&key) {
                Some(previous) => Err(format!(
                    "Key {} is mapped to both {} and {}",
                    key.name(),
                    previous,
                    action
                )),
                None => {
                    seen.insert(key, action);
                    Ok(())
                }
            }
        };

        let buttons = [
            ("a", &self.a),
            ("b", &self.b),
            ("select", &self.select),
            ("start", &self.start),
            ("up", &self.up),
            ("down", &self.down),
            ("left", &self.left),
            ("right", &self.right),
            ("save", &self.save),
            ("toggle_overlay", &self.toggle_overlay),
            ("suspend", &self.suspend),
            ("save_and_exit", &self.save_and_exit),
        ];
        for (action, keys) in buttons {
            for &key in keys {
                claim(key, action.to_string())?;
            }
        }
        for &(key, palette) in &self.palettes {
            claim(key, format!("palette {}", palette.name()))?;
        }
        for &(key, mode) in &self.scale_modes {
            claim(key, format!("scale mode {}", mode.name()))?;
        }
        Ok(())
    }
}

/// Shell commands triggered during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Commands {
    pub palette: Option<PaletteKind>,
    pub scale_mode: Option<ScaleMode>,
    pub save: bool,
    /// Fires on the press edge only
    pub toggle_overlay: bool,
    pub suspend: bool,
    pub save_and_exit: bool,
}

/// Result of mapping one keyboard snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub joypad: Joypad,
    pub commands: Commands,
}

fn any_down(state: KeyboardState, keys: &[Key]) -> bool {
    keys.iter().any(|&key| state.is_down(key))
}

/// Input Mapper
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    key_map: KeyMap,
    overlay_was_pressed: bool,
}

impl InputMapper {
    pub fn new(key_map: KeyMap) -> Self {
        InputMapper {
            key_map,
            overlay_was_pressed: false,
        }
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Map a snapshot to joypad lines and commands
    pub fn map(&mut self, state: KeyboardState) -> FrameInput {
        let map = &self.key_map;
        let held = |keys: &Vec<Key>| any_down(state, keys);

        let joypad = Joypad {
            a: !held(&map.a),
            b: !held(&map.b),
            select: !held(&map.select),
            start: !held(&map.start),
            right: !held(&map.right),
            left: !held(&map.left),
            up: !held(&map.up),
            down: !held(&map.down),
        };

        let overlay_pressed = held(&map.toggle_overlay);
        let commands = Commands {
            // with several selection keys held, the last binding wins
            palette: map
                .palettes
                .iter()
                .rev()
                .find(|(key, _)| state.is_down(*key))
                .map(|&(_, palette)| palette),
            scale_mode: map
                .scale_modes
                .iter()
                .rev()
                .find(|(key, _)| state.is_down(*key))
                .map(|&(_, mode)| mode),
            save: held(&map.save),
            toggle_overlay: overlay_pressed && !self.overlay_was_pressed,
            suspend: held(&map.suspend),
            save_and_exit: held(&map.save_and_exit),
        };
        self.overlay_was_pressed = overlay_pressed;

        FrameInput { joypad, commands }
    }
}
