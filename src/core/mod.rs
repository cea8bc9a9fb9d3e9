// Emulation core contract
//
// The CPU, PPU and memory mapper live outside this crate. This module describes
// what the shell needs from them:
// - advance one frame, calling back once per scanline (144 times)
// - report the size of the battery-backed cartridge RAM
// - accept the cartridge RAM buffer and the joypad lines
//
// A test-pattern core is provided so the shell can run without a cartridge.

mod pattern;

pub use pattern::PatternCore;

/// Emulated LCD width in pixels
pub const LCD_WIDTH: usize = 160;

/// Emulated LCD height in pixels (scanlines per frame)
pub const LCD_HEIGHT: usize = 144;

/// Length of the title field in the cartridge header (0x134..0x144)
pub const TITLE_LEN: usize = 0x10;

/// Number of entries in the color-mode fixup table
pub const FIX_PALETTE_LEN: usize = 0x40;

/// Per-pixel fixup table the core exposes in color mode (15-bit colors)
pub type FixPalette = [u16; FIX_PALETTE_LEN];

/// One scanline of emulator output
///
/// `pixels` holds 2-bit palette indices in monochrome mode. When `fix_palette`
/// is present the core is in color mode and each pixel indexes that table.
#[derive(Debug, Clone, Copy)]
pub struct Scanline<'a> {
    /// Source pixels, left to right
    pub pixels: &'a [u8; LCD_WIDTH],
    /// Line index (0-143)
    pub line: u8,
    /// Color-mode fixup table, `None` in monochrome mode
    pub fix_palette: Option<&'a FixPalette>,
}

impl<'a> Scanline<'a> {
    /// Create a monochrome scanline
    pub fn indexed(pixels: &'a [u8; LCD_WIDTH], line: u8) -> Self {
        Self {
            pixels,
            line,
            fix_palette: None,
        }
    }

    /// Create a color-mode scanline
    pub fn extended(pixels: &'a [u8; LCD_WIDTH], line: u8, fix_palette: &'a FixPalette) -> Self {
        Self {
            pixels,
            line,
            fix_palette: Some(fix_palette),
        }
    }
}

/// Receiver of the per-scanline callback
pub trait LineSink {
    /// Called synchronously, once per line index 0..143, in increasing order
    fn draw_line(&mut self, scanline: Scanline<'_>);
}

/// Joypad lines as the core expects them
///
/// Lines are active-low: `false` means the button is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joypad {
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
}

impl Joypad {
    /// All buttons released
    pub const RELEASED: Joypad = Joypad {
        a: true,
        b: true,
        select: true,
        start: true,
        right: true,
        left: true,
        up: true,
        down: true,
    };

    /// Pack the lines into the joypad register layout
    ///
    /// bit0 A, bit1 B, bit2 Select, bit3 Start, bit4 Right, bit5 Left,
    /// bit6 Up, bit7 Down. A held button reads as 0.
    pub fn to_register_bits(self) -> u8 {
        (self.a as u8)
            | (self.b as u8) << 1
            | (self.select as u8) << 2
            | (self.start as u8) << 3
            | (self.right as u8) << 4
            | (self.left as u8) << 5
            | (self.up as u8) << 6
            | (self.down as u8) << 7
    }

    /// Whether any button is held
    pub fn any_pressed(self) -> bool {
        self.to_register_bits() != 0xFF
    }
}

impl Default for Joypad {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Errors raised while bringing up the emulation core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The cartridge image was rejected
    InvalidCartridge(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::InvalidCartridge(reason) => write!(f, "Invalid cartridge: {}", reason),
        }
    }
}

impl std::error::Error for CoreError {}

/// The emulation core as seen from the shell
pub trait EmulationCore {
    /// Initialize the core; an error here is fatal for the program
    fn power_on(&mut self) -> Result<(), CoreError>;

    /// Advance the emulated machine by exactly one frame
    ///
    /// `lcd` receives every scanline of the frame. The machine state always
    /// advances, even when the sink discards the pixels.
    fn run_frame(&mut self, lcd: &mut dyn LineSink);

    /// Size in bytes of the battery-backed cartridge RAM (0 if none)
    fn save_ram_size(&self) -> usize;

    /// Raw 16-byte title field of the cartridge header
    fn cartridge_title(&self) -> [u8; TITLE_LEN];

    /// Hand the cartridge RAM buffer to the core
    fn attach_cart_ram(&mut self, ram: Vec<u8>);

    /// Current cartridge RAM contents
    fn cart_ram(&self) -> &[u8];

    /// Joypad lines for the next frame
    fn set_joypad(&mut self, joypad: Joypad);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joypad_released_reads_all_ones() {
        assert_eq!(Joypad::RELEASED.to_register_bits(), 0xFF);
        assert!(!Joypad::default().any_pressed());
    }

    #[test]
    fn test_joypad_bit_layout() {
        let joypad = Joypad {
            a: false,
            down: false,
            ..Joypad::RELEASED
        };
        assert_eq!(joypad.to_register_bits(), 0b0111_1110);
        assert!(joypad.any_pressed());

        let joypad = Joypad {
            start: false,
            right: false,
            ..Joypad::RELEASED
        };
        assert_eq!(joypad.to_register_bits(), 0b1110_0111);
    }

    #[test]
    fn test_core_error_display() {
        let err = CoreError::InvalidCartridge("bad checksum".to_string());
        assert_eq!(err.to_string(), "Invalid cartridge: bad checksum");
    }
}
