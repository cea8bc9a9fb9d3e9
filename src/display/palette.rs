// Palette table - Monochrome shade to RGB565 conversion
//
// Monochrome games produce 2-bit shades (0 = lightest, 3 = darkest). The shell
// ships five fixed palettes; exactly one is active at a time.

use super::Color;
use serde::{Deserialize, Serialize};

/// Built-in palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    /// Green-tinted original handheld look
    #[default]
    Original,
    Gray,
    GrayNegative,
    Peanut,
    VirtualBoy,
}

impl PaletteKind {
    /// All palettes in selection order
    pub const ALL: [PaletteKind; 5] = [
        PaletteKind::Original,
        PaletteKind::Gray,
        PaletteKind::GrayNegative,
        PaletteKind::Peanut,
        PaletteKind::VirtualBoy,
    ];

    /// The four RGB565 colors, lightest shade first
    pub const fn colors(self) -> [Color; 4] {
        match self {
            PaletteKind::Original => [0x8F80, 0x24CC, 0x4402, 0x0A40],
            PaletteKind::Gray => [0xFFFF, 0xAD55, 0x52AA, 0x0000],
            PaletteKind::GrayNegative => [0x0000, 0x52AA, 0xAD55, 0xFFFF],
            PaletteKind::Peanut => [0x9DE1, 0x8D61, 0x3306, 0x09C1],
            PaletteKind::VirtualBoy => [0xE800, 0xA000, 0x5000, 0x0000],
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            PaletteKind::Original => "Original",
            PaletteKind::Gray => "Gray",
            PaletteKind::GrayNegative => "Gray negative",
            PaletteKind::Peanut => "Peanut",
            PaletteKind::VirtualBoy => "Virtual Boy",
        }
    }
}

/// Holds the active palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteTable {
    active: PaletteKind,
}

impl PaletteTable {
    pub fn new(active: PaletteKind) -> Self {
        PaletteTable { active }
    }

    /// Make `kind` the active palette; takes effect on the next lookup
    pub fn select(&mut self, kind: PaletteKind) {
        self.active = kind;
    }

    pub fn active(&self) -> PaletteKind {
        self.active
    }

    /// Color for a shade; only the low two bits are used
    #[inline]
    pub fn lookup(&self, shade: u8) -> Color {
        self.active.colors()[(shade & 0x03) as usize]
    }
}
