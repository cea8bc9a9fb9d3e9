// Pixel color mapping
//
// Converts emulator pixels to RGB565. Monochrome pixels go through the active
// palette. Color-mode pixels come from the core's 15-bit fixup table and are
// rearranged into the screen's 5-6-5 layout.

use super::palette::PaletteTable;
use super::Color;
use crate::core::{FixPalette, Scanline, FIX_PALETTE_LEN, LCD_WIDTH};

/// Rearrange a 15-bit color-mode value into RGB565
///
/// Two shifts are applied in sequence. The first moves the low field to the
/// top, the middle field up one bit and the high field to the bottom. The
/// second swaps the top and bottom fields of that result.
#[inline]
pub fn swizzle_cgb(color: u16) -> Color {
    let c1 = ((color & 0x001F) << 11) | ((color & 0x03E0) << 1) | ((color & 0x7C00) >> 10);
    ((c1 & 0x001F) << 11) | (c1 & 0x07E0) | ((c1 & 0xF800) >> 11)
}

/// Map one source pixel
#[inline]
pub fn map_pixel(pixel: u8, palette: &PaletteTable, fix_palette: Option<&FixPalette>) -> Color {
    match fix_palette {
        Some(table) => swizzle_cgb(table[pixel as usize % FIX_PALETTE_LEN]),
        None => palette.lookup(pixel),
    }
}

/// Map a whole scanline into `out`
pub fn map_line(scanline: &Scanline<'_>, palette: &PaletteTable, out: &mut [Color; LCD_WIDTH]) {
    match scanline.fix_palette {
        Some(table) => {
            for (dst, &pixel) in out.iter_mut().zip(scanline.pixels.iter()) {
                *dst = swizzle_cgb(table[pixel as usize % FIX_PALETTE_LEN]);
            }
        }
        None => {
            for (dst, &pixel) in out.iter_mut().zip(scanline.pixels.iter()) {
                *dst = palette.lookup(pixel);
            }
        }
    }
}
