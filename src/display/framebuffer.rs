// Frame Buffer - In-memory copy of the calculator screen
//
// The screen is 320×240 pixels in RGB565. The desktop window draws the
// emulator into this buffer and converts it to RGBA once per redraw.

use super::font;
use super::{Color, Display, Rect, BLACK, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Total number of pixels in the frame buffer
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Expand an RGB565 color to RGBA bytes
///
/// # Arguments
/// * `color` - 16-bit color (5 bits red, 6 bits green, 5 bits blue)
///
/// # Returns
/// Array of [R, G, B, A] bytes
#[inline]
pub fn rgb565_to_rgba(color: Color) -> [u8; 4] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [
        (r << 3) | (r >> 2), // Red
        (g << 2) | (g >> 4), // Green
        (b << 3) | (b >> 2), // Blue
        0xFF,                // Alpha (fully opaque)
    ]
}

/// RGB565 frame buffer
pub struct FrameBuffer {
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame buffer initialized to black
    pub fn new() -> Self {
        Self {
            pixels: vec![BLACK; SCREEN_SIZE],
        }
    }

    /// Get a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        assert!(x < SCREEN_WIDTH, "X coordinate {} out of bounds", x);
        assert!(y < SCREEN_HEIGHT, "Y coordinate {} out of bounds", y);

        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// Set a pixel, ignoring coordinates outside the screen
    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = color;
        }
    }

    /// One screen row
    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// Get the raw pixel data
    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert the frame buffer to RGBA format for display
    ///
    /// # Panics
    /// Panics if output buffer is smaller than SCREEN_SIZE * 4 bytes
    pub fn to_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= SCREEN_SIZE * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (chunk, &color) in output.chunks_exact_mut(4).zip(self.pixels.iter()) {
            chunk.copy_from_slice(&rgb565_to_rgba(color));
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FrameBuffer {
    fn blit_rect(&mut self, rect: Rect, pixels: &[Color]) {
        let clipped = rect.clipped();
        if rect.width == 0 {
            return;
        }

        for (row, src) in pixels.chunks(rect.width).take(clipped.height).enumerate() {
            let start = (clipped.y + row) * SCREEN_WIDTH + clipped.x;
            let len = clipped.width.min(src.len());
            self.pixels[start..start + len].copy_from_slice(&src[..len]);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.clipped();
        for y in rect.y..rect.y + rect.height {
            let start = y * SCREEN_WIDTH + rect.x;
            self.pixels[start..start + rect.width].fill(color);
        }
    }

    fn draw_string(&mut self, text: &str, x: usize, y: usize, fg: Color, bg: Color) {
        font::render_text(text, fg, bg, |dx, dy, color| {
            self.put_pixel(x + dx, y + dy, color);
        });
    }
}
