// Scaling Renderer - Source scanlines to device rows
//
// Each 160-pixel scanline from the core is color-mapped and blitted straight
// away; no full frame is buffered. Three scaling strategies are available plus
// a skip strategy that discards the pixels of frames the pacer decided not to
// present.
//
// Vertical 5:3 rule shared by the two maximized strategies: source line `l`
// lands on row `5 * l / 3` and is repeated on the row below when `l % 3 != 0`,
// so 144 lines fill exactly 240 rows.

use super::color::map_line;
use super::palette::PaletteTable;
use super::{Color, Display, Rect, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::core::{LineSink, Scanline, LCD_HEIGHT, LCD_WIDTH};
use serde::{Deserialize, Serialize};

/// Horizontal ratio numerator (166/100 approximates 1.66)
pub const RATIO_NUM: usize = 166;

/// Horizontal ratio denominator
pub const RATIO_DEN: usize = 100;

/// Width covered by the ratio-preserving strategy
pub const RATIO_WIDTH: usize = RATIO_NUM * (LCD_WIDTH - 1) / RATIO_DEN + 2;

/// Left edge of the ratio-preserving strategy
pub const RATIO_X: usize = (SCREEN_WIDTH - RATIO_WIDTH) / 2;

/// Top-left corner of the centered strategy
pub const CENTERED_X: usize = (SCREEN_WIDTH - LCD_WIDTH) / 2;
pub const CENTERED_Y: usize = (SCREEN_HEIGHT - LCD_HEIGHT) / 2;

/// User-selectable scaling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// 1:1, centered on both axes
    Centered,
    /// Each pixel doubled horizontally, 5:3 vertically
    #[serde(rename = "maximized_2x")]
    Maximized2x,
    /// 166/100 horizontally, 5:3 vertically, centered
    #[default]
    MaximizedRatio,
}

impl ScaleMode {
    pub fn name(self) -> &'static str {
        match self {
            ScaleMode::Centered => "Centered",
            ScaleMode::Maximized2x => "Maximized 2x",
            ScaleMode::MaximizedRatio => "Maximized ratio",
        }
    }
}

/// Strategy applied to the scanlines of the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStrategy {
    Centered,
    Maximized2x,
    MaximizedRatio,
    /// Discard pixels; the core still runs the whole frame
    Skip,
}

impl From<ScaleMode> for DrawStrategy {
    fn from(mode: ScaleMode) -> Self {
        match mode {
            ScaleMode::Centered => DrawStrategy::Centered,
            ScaleMode::Maximized2x => DrawStrategy::Maximized2x,
            ScaleMode::MaximizedRatio => DrawStrategy::MaximizedRatio,
        }
    }
}

/// Destination column of a source pixel under the ratio strategy
#[inline]
pub fn ratio_dest_x(src_x: usize) -> usize {
    RATIO_NUM * src_x / RATIO_DEN
}

/// Destination row of a source line under the 5:3 rule, and whether the
/// line is repeated on the following row
#[inline]
pub fn five_thirds_row(line: usize) -> (usize, bool) {
    (5 * line / 3, line % 3 != 0)
}

/// Scanline renderer
///
/// Owns the active palette and scaling mode. The strategy used for a frame
/// is latched when line 0 arrives, so mode changes never tear a frame.
pub struct Renderer {
    palette: PaletteTable,
    scale_mode: ScaleMode,
    active: DrawStrategy,
    skip_next_frame: bool,
    colors: [Color; LCD_WIDTH],
    scaled: [Color; SCREEN_WIDTH],
}

impl Renderer {
    pub fn new(palette: PaletteTable, scale_mode: ScaleMode) -> Self {
        Renderer {
            palette,
            scale_mode,
            active: scale_mode.into(),
            skip_next_frame: false,
            colors: [0; LCD_WIDTH],
            scaled: [0; SCREEN_WIDTH],
        }
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Select the scaling mode for the next frame
    ///
    /// Returns `true` if the mode changed. The caller is responsible for
    /// clearing the screen before the next frame when it did.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) -> bool {
        let changed = self.scale_mode != mode;
        self.scale_mode = mode;
        changed
    }

    pub fn palette(&self) -> &PaletteTable {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut PaletteTable {
        &mut self.palette
    }

    /// Strategy latched for the frame in progress
    pub fn active_strategy(&self) -> DrawStrategy {
        self.active
    }

    pub fn skip_next_frame(&self) -> bool {
        self.skip_next_frame
    }

    pub fn set_skip_next_frame(&mut self, skip: bool) {
        self.skip_next_frame = skip;
    }

    /// Alternate between drawing and skipping the next frame
    pub fn toggle_skip_next_frame(&mut self) {
        self.skip_next_frame = !self.skip_next_frame;
    }

    /// Pair the renderer with a display for the duration of one frame
    pub fn bind<'a, D: Display + ?Sized>(&'a mut self, display: &'a mut D) -> RenderSink<'a, D> {
        RenderSink {
            renderer: self,
            display,
        }
    }

    /// Render one scanline onto `display`
    pub fn draw_line<D: Display + ?Sized>(&mut self, display: &mut D, scanline: Scanline<'_>) {
        if scanline.line == 0 {
            self.active = if self.skip_next_frame {
                DrawStrategy::Skip
            } else {
                self.scale_mode.into()
            };
        }

        let line = scanline.line as usize;
        match self.active {
            DrawStrategy::Skip => {}
            DrawStrategy::Centered => {
                map_line(&scanline, &self.palette, &mut self.colors);
                display.blit_rect(
                    Rect::new(CENTERED_X, CENTERED_Y + line, LCD_WIDTH, 1),
                    &self.colors,
                );
            }
            DrawStrategy::Maximized2x => {
                map_line(&scanline, &self.palette, &mut self.colors);
                for (i, &color) in self.colors.iter().enumerate() {
                    self.scaled[2 * i] = color;
                    self.scaled[2 * i + 1] = color;
                }
                Self::blit_five_thirds(display, 0, line, &self.scaled[..SCREEN_WIDTH]);
            }
            DrawStrategy::MaximizedRatio => {
                map_line(&scanline, &self.palette, &mut self.colors);
                for (i, &color) in self.colors.iter().enumerate() {
                    let x = ratio_dest_x(i);
                    self.scaled[x] = color;
                    self.scaled[x + 1] = color;
                }
                Self::blit_five_thirds(display, RATIO_X, line, &self.scaled[..RATIO_WIDTH]);
            }
        }
    }

    fn blit_five_thirds<D: Display + ?Sized>(display: &mut D, x: usize, line: usize, row: &[Color]) {
        let (y, doubled) = five_thirds_row(line);
        display.blit_rect(Rect::new(x, y, row.len(), 1), row);
        if doubled {
            display.blit_rect(Rect::new(x, y + 1, row.len(), 1), row);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(PaletteTable::default(), ScaleMode::default())
    }
}

/// A renderer bound to a display, handed to the core as its line sink
pub struct RenderSink<'a, D: Display + ?Sized> {
    renderer: &'a mut Renderer,
    display: &'a mut D,
}

impl<D: Display + ?Sized> LineSink for RenderSink<'_, D> {
    fn draw_line(&mut self, scanline: Scanline<'_>) {
        self.renderer.draw_line(&mut *self.display, scanline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RectLog {
        rects: Vec<Rect>,
    }

    impl Display for RectLog {
        fn blit_rect(&mut self, rect: Rect, pixels: &[Color]) {
            assert_eq!(pixels.len(), rect.area());
            self.rects.push(rect);
        }

        fn fill_rect(&mut self, _rect: Rect, _color: Color) {}

        fn draw_string(&mut self, _text: &str, _x: usize, _y: usize, _fg: Color, _bg: Color) {}
    }

    #[test]
    fn test_ratio_constants() {
        assert_eq!(RATIO_WIDTH, 265);
        assert_eq!(RATIO_X, 27);
        assert_eq!(ratio_dest_x(159), 263);
        assert_eq!(CENTERED_X, 80);
        assert_eq!(CENTERED_Y, 48);
    }

    #[test]
    fn test_five_thirds_row() {
        assert_eq!(five_thirds_row(0), (0, false));
        assert_eq!(five_thirds_row(1), (1, true));
        assert_eq!(five_thirds_row(2), (3, true));
        assert_eq!(five_thirds_row(3), (5, false));
        assert_eq!(five_thirds_row(143), (238, true));
    }

    #[test]
    fn test_centered_blits_one_row_per_line() {
        let mut renderer = Renderer::new(PaletteTable::default(), ScaleMode::Centered);
        let mut display = RectLog::default();
        let pixels = [1u8; LCD_WIDTH];

        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 0));
        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 1));
        assert_eq!(
            display.rects,
            vec![Rect::new(80, 48, 160, 1), Rect::new(80, 49, 160, 1)]
        );
    }

    #[test]
    fn test_ratio_doubles_rows() {
        let mut renderer = Renderer::default();
        let mut display = RectLog::default();
        let pixels = [0u8; LCD_WIDTH];

        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 0));
        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 1));
        assert_eq!(
            display.rects,
            vec![
                Rect::new(27, 0, 265, 1),
                Rect::new(27, 1, 265, 1),
                Rect::new(27, 2, 265, 1),
            ]
        );
    }

    #[test]
    fn test_skip_is_latched_at_line_zero() {
        let mut renderer = Renderer::default();
        let mut display = RectLog::default();
        let pixels = [0u8; LCD_WIDTH];

        renderer.set_skip_next_frame(true);
        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 0));
        // a change mid-frame does not affect the frame in progress
        renderer.set_skip_next_frame(false);
        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 1));
        assert!(display.rects.is_empty());
        assert_eq!(renderer.active_strategy(), DrawStrategy::Skip);

        renderer.draw_line(&mut display, Scanline::indexed(&pixels, 0));
        assert_eq!(renderer.active_strategy(), DrawStrategy::MaximizedRatio);
        assert_eq!(display.rects.len(), 1);
    }

    #[test]
    fn test_set_scale_mode_reports_change() {
        let mut renderer = Renderer::default();
        assert!(!renderer.set_scale_mode(ScaleMode::MaximizedRatio));
        assert!(renderer.set_scale_mode(ScaleMode::Centered));
        assert_eq!(renderer.scale_mode(), ScaleMode::Centered);
    }

    #[test]
    fn test_toggle_skip_next_frame() {
        let mut renderer = Renderer::default();
        renderer.toggle_skip_next_frame();
        assert!(renderer.skip_next_frame());
        renderer.toggle_skip_next_frame();
        assert!(!renderer.skip_next_frame());
    }
}
