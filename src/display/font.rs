// Bitmap font for the status overlay
//
// 4x5 glyphs, drawn at 2x so each character cell is 10×10 pixels.
// Bits are MSB-left within each row byte; only the top 4 bits are used.

use super::Color;

const GLYPH_W: usize = 4;
const GLYPH_H: usize = 5;

/// Pixel scale applied to every glyph
pub const SCALE: usize = 2;

/// Horizontal advance per character, including spacing
pub const CELL_WIDTH: usize = (GLYPH_W + 1) * SCALE;

/// Height of a line of text
pub const CELL_HEIGHT: usize = GLYPH_H * SCALE;

/// Row bitmap for a character; unknown characters render blank
pub fn glyph(ch: char) -> [u8; GLYPH_H] {
    match ch.to_ascii_uppercase() {
        '0' => [0x60, 0x90, 0x90, 0x90, 0x60],
        '1' => [0x20, 0x60, 0x20, 0x20, 0x70],
        '2' => [0x60, 0x90, 0x20, 0x40, 0xF0],
        '3' => [0x60, 0x90, 0x20, 0x90, 0x60],
        '4' => [0x90, 0x90, 0xF0, 0x10, 0x10],
        '5' => [0xF0, 0x80, 0xE0, 0x10, 0xE0],
        '6' => [0x60, 0x80, 0xE0, 0x90, 0x60],
        '7' => [0xF0, 0x10, 0x20, 0x40, 0x40],
        '8' => [0x60, 0x90, 0x60, 0x90, 0x60],
        '9' => [0x60, 0x90, 0x70, 0x10, 0x60],
        'A' => [0x60, 0x90, 0xF0, 0x90, 0x90],
        'B' => [0xE0, 0x90, 0xE0, 0x90, 0xE0],
        'C' => [0x70, 0x80, 0x80, 0x80, 0x70],
        'D' => [0xE0, 0x90, 0x90, 0x90, 0xE0],
        'E' => [0xF0, 0x80, 0xE0, 0x80, 0xF0],
        'F' => [0xF0, 0x80, 0xE0, 0x80, 0x80],
        'G' => [0x70, 0x80, 0xB0, 0x90, 0x70],
        'H' => [0x90, 0x90, 0xF0, 0x90, 0x90],
        'I' => [0x70, 0x20, 0x20, 0x20, 0x70],
        'J' => [0x10, 0x10, 0x10, 0x90, 0x60],
        'K' => [0x90, 0xA0, 0xC0, 0xA0, 0x90],
        'L' => [0x80, 0x80, 0x80, 0x80, 0xF0],
        'M' => [0x90, 0xF0, 0xF0, 0x90, 0x90],
        'N' => [0x90, 0xD0, 0xB0, 0x90, 0x90],
        'O' => [0x60, 0x90, 0x90, 0x90, 0x60],
        'P' => [0xE0, 0x90, 0xE0, 0x80, 0x80],
        'Q' => [0x60, 0x90, 0x90, 0xB0, 0x70],
        'R' => [0xE0, 0x90, 0xE0, 0xA0, 0x90],
        'S' => [0x70, 0x80, 0x60, 0x10, 0xE0],
        'T' => [0xF0, 0x40, 0x40, 0x40, 0x40],
        'U' => [0x90, 0x90, 0x90, 0x90, 0x60],
        'V' => [0x90, 0x90, 0x90, 0x60, 0x60],
        'W' => [0x90, 0x90, 0xF0, 0xF0, 0x90],
        'X' => [0x90, 0x90, 0x60, 0x90, 0x90],
        'Y' => [0x90, 0x90, 0x70, 0x10, 0x60],
        'Z' => [0xF0, 0x10, 0x60, 0x80, 0xF0],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x40],
        '/' => [0x10, 0x20, 0x20, 0x40, 0x80],
        ':' => [0x00, 0x40, 0x00, 0x40, 0x00],
        '-' => [0x00, 0x00, 0xF0, 0x00, 0x00],
        _ => [0x00; GLYPH_H],
    }
}

/// Width in pixels of `text` once rendered
pub fn text_width(text: &str) -> usize {
    text.chars().count() * CELL_WIDTH
}

/// Render `text` cell by cell, handing every pixel to `put`
///
/// Coordinates passed to `put` are relative to the top-left corner of the
/// text. Background pixels are emitted too so the text overwrites whatever
/// was underneath.
pub fn render_text<F>(text: &str, fg: Color, bg: Color, mut put: F)
where
    F: FnMut(usize, usize, Color),
{
    for (ci, ch) in text.chars().enumerate() {
        let rows = glyph(ch);
        let cell_x = ci * CELL_WIDTH;

        for y in 0..CELL_HEIGHT {
            let bits = rows[y / SCALE];
            for x in 0..CELL_WIDTH {
                let col = x / SCALE;
                let lit = col < GLYPH_W && bits & (0x80 >> col) != 0;
                put(cell_x + x, y, if lit { fg } else { bg });
            }
        }
    }
}
