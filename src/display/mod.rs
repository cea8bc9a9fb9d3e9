// Display module - Scanline rendering onto the calculator screen
//
// This module provides:
// - Display surface contract (320×240, RGB565)
// - Monochrome palette table (five built-in palettes)
// - Pixel color mapping (palette lookup and color-mode swizzle)
// - Scaling renderer (centered, 2x, 5:3 ratio, skip)
// - Small bitmap font for the status overlay
// - RGB565 frame buffer and desktop window using winit + pixels

pub mod color;
pub mod font;
pub mod framebuffer;
pub mod palette;
pub mod renderer;
pub mod window;

pub use color::{map_line, map_pixel, swizzle_cgb};
pub use framebuffer::FrameBuffer;
pub use palette::{PaletteKind, PaletteTable};
pub use renderer::{DrawStrategy, RenderSink, Renderer, ScaleMode};
pub use window::{run_device, DesktopPlatform, DeviceWindow, WindowConfig};

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 320;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// 16-bit RGB565 color
pub type Color = u16;

/// RGB565 black
pub const BLACK: Color = 0x0000;

/// RGB565 white
pub const WHITE: Color = 0xFFFF;

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// The whole screen
    pub const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
    };

    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Portion of the rectangle that lies on screen
    pub fn clipped(&self) -> Rect {
        let x = self.x.min(SCREEN_WIDTH);
        let y = self.y.min(SCREEN_HEIGHT);
        Rect {
            x,
            y,
            width: self.width.min(SCREEN_WIDTH - x),
            height: self.height.min(SCREEN_HEIGHT - y),
        }
    }
}

/// Target surface for the renderer and overlay
pub trait Display {
    /// Copy `pixels` (row-major, `rect.width` per row) into `rect`
    fn blit_rect(&mut self, rect: Rect, pixels: &[Color]);

    /// Fill `rect` with a single color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw_string(&mut self, text: &str, x: usize, y: usize, fg: Color, bg: Color);

    /// Fill the whole screen with black
    fn clear(&mut self) {
        self.fill_rect(Rect::SCREEN, BLACK);
    }
}
