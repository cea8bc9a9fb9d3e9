// Key map configuration
//
// Serializable form of the key map, stored in the `[keys]` table of the
// configuration file. Every action takes a list of calculator key names.

use super::mapper::KeyMap;
use super::Key;
use crate::display::{PaletteKind, ScaleMode};
use serde::{Deserialize, Serialize};

/// Serializable key map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMapConfig {
    /// Keys for the A button (e.g. ["Back"])
    pub a: Vec<String>,
    /// Keys for the B button
    pub b: Vec<String>,
    /// Keys for Select
    pub select: Vec<String>,
    /// Keys for Start
    pub start: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub palette_original: Vec<String>,
    pub palette_gray: Vec<String>,
    pub palette_gray_negative: Vec<String>,
    pub palette_peanut: Vec<String>,
    pub palette_virtual_boy: Vec<String>,
    pub scale_centered: Vec<String>,
    pub scale_maximized_2x: Vec<String>,
    pub scale_maximized_ratio: Vec<String>,
    /// Manual save
    pub save: Vec<String>,
    /// Show or hide the ms/frame counter
    pub toggle_overlay: Vec<String>,
    pub suspend: Vec<String>,
    pub save_and_exit: Vec<String>,
}

impl KeyMapConfig {
    /// Convert to a runtime key map
    ///
    /// # Returns
    /// Result containing the KeyMap or an error message naming the bad key
    pub fn to_key_map(&self) -> Result<KeyMap, String> {
        let mut palettes = Vec::new();
        for (names, palette) in [
            (&self.palette_original, PaletteKind::Original),
            (&self.palette_gray, PaletteKind::Gray),
            (&self.palette_gray_negative, PaletteKind::GrayNegative),
            (&self.palette_peanut, PaletteKind::Peanut),
            (&self.palette_virtual_boy, PaletteKind::VirtualBoy),
        ] {
            for key in parse_keys(names)? {
                palettes.push((key, palette));
            }
        }

        let mut scale_modes = Vec::new();
        for (names, mode) in [
            (&self.scale_maximized_ratio, ScaleMode::MaximizedRatio),
            (&self.scale_centered, ScaleMode::Centered),
            (&self.scale_maximized_2x, ScaleMode::Maximized2x),
        ] {
            for key in parse_keys(names)? {
                scale_modes.push((key, mode));
            }
        }

        let key_map = KeyMap {
            a: parse_keys(&self.a)?,
            b: parse_keys(&self.b)?,
            select: parse_keys(&self.select)?,
            start: parse_keys(&self.start)?,
            up: parse_keys(&self.up)?,
            down: parse_keys(&self.down)?,
            left: parse_keys(&self.left)?,
            right: parse_keys(&self.right)?,
            palettes,
            scale_modes,
            save: parse_keys(&self.save)?,
            toggle_overlay: parse_keys(&self.toggle_overlay)?,
            suspend: parse_keys(&self.suspend)?,
            save_and_exit: parse_keys(&self.save_and_exit)?,
        };
        key_map.validate()?;
        Ok(key_map)
    }

    /// Create from a runtime key map
    pub fn from_key_map(map: &KeyMap) -> Self {
        let palette = |kind: PaletteKind| -> Vec<String> {
            map.palettes
                .iter()
                .filter(|(_, p)| *p == kind)
                .map(|(key, _)| key.name().to_string())
                .collect()
        };
        let scale = |mode: ScaleMode| -> Vec<String> {
            map.scale_modes
                .iter()
                .filter(|(_, m)| *m == mode)
                .map(|(key, _)| key.name().to_string())
                .collect()
        };

        KeyMapConfig {
            a: key_names(&map.a),
            b: key_names(&map.b),
            select: key_names(&map.select),
            start: key_names(&map.start),
            up: key_names(&map.up),
            down: key_names(&map.down),
            left: key_names(&map.left),
            right: key_names(&map.right),
            palette_original: palette(PaletteKind::Original),
            palette_gray: palette(PaletteKind::Gray),
            palette_gray_negative: palette(PaletteKind::GrayNegative),
            palette_peanut: palette(PaletteKind::Peanut),
            palette_virtual_boy: palette(PaletteKind::VirtualBoy),
            scale_centered: scale(ScaleMode::Centered),
            scale_maximized_2x: scale(ScaleMode::Maximized2x),
            scale_maximized_ratio: scale(ScaleMode::MaximizedRatio),
            save: key_names(&map.save),
            toggle_overlay: key_names(&map.toggle_overlay),
            suspend: key_names(&map.suspend),
            save_and_exit: key_names(&map.save_and_exit),
        }
    }
}

impl Default for KeyMapConfig {
    fn default() -> Self {
        Self::from_key_map(&KeyMap::default())
    }
}

fn parse_keys(names: &[String]) -> Result<Vec<Key>, String> {
    names.iter().map(|name| Key::from_name(name)).collect()
}

fn key_names(keys: &[Key]) -> Vec<String> {
    keys.iter().map(|key| key.name().to_string()).collect()
}
