// Test-pattern core
//
// Stand-in emulation core that needs no cartridge. It draws diagonal stripes,
// scrolled by the d-pad, and keeps the scroll position in its cartridge RAM so
// the save path has something to persist.

use super::{
    CoreError, EmulationCore, FixPalette, Joypad, LineSink, Scanline, FIX_PALETTE_LEN, LCD_HEIGHT,
    LCD_WIDTH, TITLE_LEN,
};

/// Largest cartridge RAM a real cartridge can carry (MBC5, 16 banks)
const MAX_CART_RAM: usize = 128 * 1024;

/// Offset of the scroll position in cartridge RAM
const SCROLL_OFFSET: usize = 0;

/// Synthetic emulation core
pub struct PatternCore {
    title: [u8; TITLE_LEN],
    ram_size: usize,
    ram: Vec<u8>,
    color: Option<FixPalette>,
    joypad: Joypad,
    scroll_x: u8,
    scroll_y: u8,
    frame: u64,
}

impl PatternCore {
    /// Create a monochrome pattern core
    ///
    /// # Arguments
    ///
    /// * `title` - Cartridge title, truncated to 16 bytes
    /// * `ram_size` - Size of the battery-backed RAM in bytes
    pub fn new(title: &str, ram_size: usize) -> Self {
        let mut raw = [0u8; TITLE_LEN];
        for (dst, src) in raw.iter_mut().zip(title.bytes()) {
            *dst = src;
        }

        PatternCore {
            title: raw,
            ram_size,
            ram: Vec::new(),
            color: None,
            joypad: Joypad::RELEASED,
            scroll_x: 0,
            scroll_y: 0,
            frame: 0,
        }
    }

    /// Switch to color mode with a generated gradient fixup table
    pub fn with_color(mut self) -> Self {
        let mut table = [0u16; FIX_PALETTE_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            // 15-bit BGR: red ramps up, blue ramps down
            let level = (i as u16 * 31) / (FIX_PALETTE_LEN as u16 - 1);
            *entry = level | ((level / 2) << 5) | ((31 - level) << 10);
        }
        self.color = Some(table);
        self
    }

    /// Number of frames emulated since power-on
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Current scroll position
    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }

    fn apply_joypad(&mut self) {
        if !self.joypad.left {
            self.scroll_x = self.scroll_x.wrapping_add(1);
        }
        if !self.joypad.right {
            self.scroll_x = self.scroll_x.wrapping_sub(1);
        }
        if !self.joypad.up {
            self.scroll_y = self.scroll_y.wrapping_add(1);
        }
        if !self.joypad.down {
            self.scroll_y = self.scroll_y.wrapping_sub(1);
        }

        if self.ram.len() >= SCROLL_OFFSET + 2 {
            self.ram[SCROLL_OFFSET] = self.scroll_x;
            self.ram[SCROLL_OFFSET + 1] = self.scroll_y;
        }
    }
}

impl EmulationCore for PatternCore {
    fn power_on(&mut self) -> Result<(), CoreError> {
        if self.ram_size > MAX_CART_RAM {
            return Err(CoreError::InvalidCartridge(format!(
                "cartridge RAM of {} bytes exceeds {} bytes",
                self.ram_size, MAX_CART_RAM
            )));
        }
        self.frame = 0;
        Ok(())
    }

    fn run_frame(&mut self, lcd: &mut dyn LineSink) {
        self.apply_joypad();

        let mut pixels = [0u8; LCD_WIDTH];
        for line in 0..LCD_HEIGHT {
            let y = (line as u8).wrapping_add(self.scroll_y);
            for (x, pixel) in pixels.iter_mut().enumerate() {
                let x = (x as u8).wrapping_add(self.scroll_x);
                let band = x.wrapping_add(y) / 8;
                *pixel = match self.color {
                    Some(_) => band & 0x3F,
                    None => band & 0x03,
                };
            }

            let scanline = match &self.color {
                Some(table) => Scanline::extended(&pixels, line as u8, table),
                None => Scanline::indexed(&pixels, line as u8),
            };
            lcd.draw_line(scanline);
        }

        self.frame += 1;
    }

    fn save_ram_size(&self) -> usize {
        self.ram_size
    }

    fn cartridge_title(&self) -> [u8; TITLE_LEN] {
        self.title
    }

    fn attach_cart_ram(&mut self, ram: Vec<u8>) {
        if ram.len() >= SCROLL_OFFSET + 2 && ram[SCROLL_OFFSET..SCROLL_OFFSET + 2] != [0xFF, 0xFF]
        {
            self.scroll_x = ram[SCROLL_OFFSET];
            self.scroll_y = ram[SCROLL_OFFSET + 1];
        }
        self.ram = ram;
    }

    fn cart_ram(&self) -> &[u8] {
        &self.ram
    }

    fn set_joypad(&mut self, joypad: Joypad) {
        self.joypad = joypad;
    }
}
