// Common test utilities for integration tests
//
// Provides a recording display, a scripted platform (keys and frame timings
// fed from queues) and a minimal emulation core.

#![allow(dead_code)]

use calcboy::core::{
    CoreError, EmulationCore, Joypad, LineSink, Scanline, LCD_HEIGHT, LCD_WIDTH, TITLE_LEN,
};
use calcboy::display::{Color, Display, Rect};
use calcboy::input::{Key, Keyboard, KeyboardState};
use calcboy::session::Platform;
use calcboy::timing::Clock;
use std::cell::Cell;
use std::collections::VecDeque;

/// Build a 16-byte cartridge title field, NUL padded
pub fn title(text: &str) -> [u8; TITLE_LEN] {
    let mut raw = [0u8; TITLE_LEN];
    raw[..text.len()].copy_from_slice(text.as_bytes());
    raw
}

/// Deterministic pseudo-random bytes (LCG)
pub fn lcg_bytes(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Scanline pixels where every pixel has the same value
pub fn uniform_pixels(value: u8) -> [u8; LCD_WIDTH] {
    [value; LCD_WIDTH]
}

/// One blit issued to the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blit {
    pub rect: Rect,
    pub pixels: Vec<Color>,
}

/// Display that records every call
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub blits: Vec<Blit>,
    pub fills: Vec<(Rect, Color)>,
    pub strings: Vec<(String, usize, usize)>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination rows written, in call order
    pub fn rows(&self) -> Vec<usize> {
        self.blits.iter().map(|b| b.rect.y).collect()
    }

    pub fn reset(&mut self) {
        self.blits.clear();
        self.fills.clear();
        self.strings.clear();
    }

    pub fn clears(&self) -> usize {
        self.fills.iter().filter(|(rect, _)| *rect == Rect::SCREEN).count()
    }
}

impl Display for RecordingDisplay {
    fn blit_rect(&mut self, rect: Rect, pixels: &[Color]) {
        assert_eq!(pixels.len(), rect.area(), "blit size does not match rect");
        self.blits.push(Blit {
            rect,
            pixels: pixels.to_vec(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fills.push((rect, color));
    }

    fn draw_string(&mut self, text: &str, x: usize, y: usize, _fg: Color, _bg: Color) {
        self.strings.push((text.to_string(), x, y));
    }
}

/// Platform driven by scripted keys and frame durations
///
/// The clock is read twice per frame by the session. The second read of each
/// frame advances time by the next scripted duration (16 ms when the script
/// is exhausted). Sleeps advance time too.
pub struct ScriptedPlatform {
    pub display: RecordingDisplay,
    pub keys: VecDeque<KeyboardState>,
    durations: std::cell::RefCell<VecDeque<u64>>,
    now: Cell<u64>,
    frame_open: Cell<bool>,
    pub sleeps: Vec<u32>,
    pub suspends: usize,
    pub pre_exits: usize,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        ScriptedPlatform {
            display: RecordingDisplay::new(),
            keys: VecDeque::new(),
            durations: std::cell::RefCell::new(VecDeque::new()),
            now: Cell::new(1_000),
            frame_open: Cell::new(false),
            sleeps: Vec::new(),
            suspends: 0,
            pre_exits: 0,
        }
    }

    /// Queue frame durations in milliseconds
    pub fn with_durations(self, durations: &[u64]) -> Self {
        self.durations.borrow_mut().extend(durations.iter().copied());
        self
    }

    /// Queue a keyboard snapshot for the next unscanned frame
    pub fn push_keys(&mut self, keys: &[Key]) {
        self.keys
            .push_back(KeyboardState::from_keys(keys.iter().copied()));
    }

    /// Queue a frame with no keys held
    pub fn push_idle(&mut self) {
        self.keys.push_back(KeyboardState::EMPTY);
    }
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScriptedPlatform {
    fn blit_rect(&mut self, rect: Rect, pixels: &[Color]) {
        self.display.blit_rect(rect, pixels);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.display.fill_rect(rect, color);
    }

    fn draw_string(&mut self, text: &str, x: usize, y: usize, fg: Color, bg: Color) {
        self.display.draw_string(text, x, y, fg, bg);
    }
}

impl Keyboard for ScriptedPlatform {
    fn scan(&mut self) -> KeyboardState {
        self.keys.pop_front().unwrap_or(KeyboardState::EMPTY)
    }
}

impl Clock for ScriptedPlatform {
    fn now_millis(&self) -> u64 {
        if self.frame_open.get() {
            let duration = self.durations.borrow_mut().pop_front().unwrap_or(16);
            self.now.set(self.now.get() + duration);
        }
        self.frame_open.set(!self.frame_open.get());
        self.now.get()
    }

    fn sleep_millis(&mut self, ms: u32) {
        self.sleeps.push(ms);
        self.now.set(self.now.get() + ms as u64);
    }
}

impl Platform for ScriptedPlatform {
    fn suspend(&mut self) {
        self.suspends += 1;
    }

    fn pre_exit(&mut self) {
        self.pre_exits += 1;
    }
}

/// Minimal core: uniform scanlines, plain RAM buffer, joypad log
pub struct TestCore {
    pub title: [u8; TITLE_LEN],
    pub ram_size: usize,
    pub ram: Vec<u8>,
    pub shade: u8,
    pub joypads: Vec<Joypad>,
    pub frames: u64,
    pub fail_power_on: bool,
}

impl TestCore {
    pub fn new(title_text: &str, ram_size: usize) -> Self {
        TestCore {
            title: title(title_text),
            ram_size,
            ram: Vec::new(),
            shade: 1,
            joypads: Vec::new(),
            frames: 0,
            fail_power_on: false,
        }
    }
}

impl EmulationCore for TestCore {
    fn power_on(&mut self) -> Result<(), CoreError> {
        if self.fail_power_on {
            return Err(CoreError::InvalidCartridge("bad header".to_string()));
        }
        Ok(())
    }

    fn run_frame(&mut self, lcd: &mut dyn LineSink) {
        let pixels = uniform_pixels(self.shade);
        for line in 0..LCD_HEIGHT {
            lcd.draw_line(Scanline::indexed(&pixels, line as u8));
        }
        self.frames += 1;
    }

    fn save_ram_size(&self) -> usize {
        self.ram_size
    }

    fn cartridge_title(&self) -> [u8; TITLE_LEN] {
        self.title
    }

    fn attach_cart_ram(&mut self, ram: Vec<u8>) {
        self.ram = ram;
    }

    fn cart_ram(&self) -> &[u8] {
        &self.ram
    }

    fn set_joypad(&mut self, joypad: Joypad) {
        self.joypads.push(joypad);
    }
}
