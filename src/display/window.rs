// Desktop host - Runs a session in a window
//
// The calculator screen is emulated by an RGB565 frame buffer that is
// presented through winit + pixels after every frame. Keyboard events come
// from the window, gamepad events from gilrs; both are merged into one
// calculator keyboard snapshot.

use super::framebuffer::FrameBuffer;
use super::{Color, Display, Rect, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::core::EmulationCore;
use crate::input::{GamepadHandler, Keyboard, KeyboardHandler, KeyboardState};
use crate::save::FileStore;
use crate::session::{FrameOutcome, Platform, Session};
use crate::timing::{Clock, SystemClock};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Scale factor (1x, 2x, 3x, 4x)
    pub scale: u32,
}

impl WindowConfig {
    /// Default: 2x scale
    pub fn new() -> Self {
        Self { scale: 2 }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 4);
        self
    }

    /// Get the window width in pixels
    pub fn window_width(&self) -> u32 {
        SCREEN_WIDTH as u32 * self.scale
    }

    /// Get the window height in pixels
    pub fn window_height(&self) -> u32 {
        SCREEN_HEIGHT as u32 * self.scale
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Host services backed by the desktop
pub struct DesktopPlatform {
    frame_buffer: FrameBuffer,
    keyboard: KeyboardHandler,
    gamepad: GamepadHandler,
    clock: SystemClock,
    window: Option<Arc<Window>>,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self::with_gamepad(GamepadHandler::new())
    }

    pub fn with_gamepad(gamepad: GamepadHandler) -> Self {
        Self {
            frame_buffer: FrameBuffer::new(),
            keyboard: KeyboardHandler::new(),
            gamepad,
            clock: SystemClock::new(),
            window: None,
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardHandler {
        &mut self.keyboard
    }

    fn attach_window(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DesktopPlatform {
    fn blit_rect(&mut self, rect: Rect, pixels: &[Color]) {
        self.frame_buffer.blit_rect(rect, pixels);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.frame_buffer.fill_rect(rect, color);
    }

    fn draw_string(&mut self, text: &str, x: usize, y: usize, fg: Color, bg: Color) {
        self.frame_buffer.draw_string(text, x, y, fg, bg);
    }
}

impl Keyboard for DesktopPlatform {
    fn scan(&mut self) -> KeyboardState {
        self.keyboard.scan() | self.gamepad.scan()
    }
}

impl Clock for DesktopPlatform {
    fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    fn sleep_millis(&mut self, ms: u32) {
        self.clock.sleep_millis(ms);
    }
}

impl Platform for DesktopPlatform {
    fn suspend(&mut self) {
        self.keyboard.release_all();
        if let Some(window) = &self.window {
            window.set_minimized(true);
        }
    }

    fn pre_exit(&mut self) {
        log::debug!("Releasing desktop resources");
        self.window = None;
    }
}

/// Window running a session
pub struct DeviceWindow<C: EmulationCore, S: FileStore> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    platform: DesktopPlatform,
    session: Session<C, S>,
    error: Option<Box<dyn std::error::Error>>,
    exiting: bool,
}

impl<C: EmulationCore, S: FileStore> DeviceWindow<C, S> {
    pub fn new(config: WindowConfig, session: Session<C, S>, platform: DesktopPlatform) -> Self {
        Self {
            window: None,
            pixels: None,
            config,
            platform,
            session,
            error: None,
            exiting: false,
        }
    }

    fn create_surface(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let window_attributes = Window::default_attributes()
            .with_title("calcboy")
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface_texture)?;

        self.platform.attach_window(window.clone());
        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn present(&mut self) -> Result<(), pixels::Error> {
        if let Some(pixels) = &mut self.pixels {
            self.platform.frame_buffer.to_rgba(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn std::error::Error>) {
        log::error!("{}", error);
        self.error = Some(error);
        self.exiting = true;
        event_loop.exit();
    }
}

impl<C: EmulationCore, S: FileStore> ApplicationHandler for DeviceWindow<C, S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if !self.exiting {
                    log::info!("Close requested, saving and exiting");
                    self.session.shutdown(&mut self.platform);
                    self.exiting = true;
                }
                event_loop.exit();
            }
            WindowEvent::Focused(false) => {
                self.platform.keyboard.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.platform.keyboard.handle_key_press(physical_key),
                ElementState::Released => self.platform.keyboard.handle_key_release(physical_key),
            },
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.present() {
                    self.fail(event_loop, Box::new(e));
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.pixels.is_none() || self.exiting {
            return;
        }

        match self.session.step_frame(&mut self.platform) {
            FrameOutcome::Continue => {
                if let Err(e) = self.present() {
                    self.fail(event_loop, Box::new(e));
                }
            }
            FrameOutcome::Exit => {
                self.exiting = true;
                event_loop.exit();
            }
        }
    }
}

/// Run a session in a desktop window until it exits
///
/// # Arguments
/// * `config` - Window configuration
/// * `session` - Started session
/// * `platform` - Platform the session was started on
///
/// # Returns
/// Result indicating success or the error that stopped the window
pub fn run_device<C: EmulationCore, S: FileStore>(
    config: WindowConfig,
    session: Session<C, S>,
    platform: DesktopPlatform,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    // the session paces itself
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut device = DeviceWindow::new(config, session, platform);

    log::info!(
        "Window size: {}x{} ({}x scale)",
        config.window_width(),
        config.window_height(),
        config.scale
    );

    event_loop.run_app(&mut device)?;

    match device.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_defaults() {
        let config = WindowConfig::new();
        assert_eq!(config.scale, 2);
        assert_eq!(config.window_width(), 640);
        assert_eq!(config.window_height(), 480);
    }

    #[test]
    fn test_scale_clamping() {
        let config = WindowConfig::new().with_scale(100);
        assert_eq!(config.scale, 4);

        let config = WindowConfig::new().with_scale(0);
        assert_eq!(config.scale, 1);
    }

    #[test]
    fn test_platform_display_writes_frame_buffer() {
        let mut platform = DesktopPlatform::with_gamepad(GamepadHandler::disabled());
        platform.fill_rect(Rect::new(0, 0, 4, 4), 0xF800);
        assert_eq!(platform.frame_buffer().get_pixel(3, 3), 0xF800);

        platform.clear();
        assert_eq!(platform.frame_buffer().get_pixel(3, 3), 0x0000);
    }

    #[test]
    fn test_platform_scan_without_window() {
        let mut platform = DesktopPlatform::with_gamepad(GamepadHandler::disabled());
        assert!(platform.scan().is_empty());
        platform.suspend();
    }
}
