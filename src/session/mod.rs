// Session - Per-frame coordination of core, renderer, pacer, input and saves
//
// The session owns every piece of mutable shell state (palette, scaling mode,
// frame-skip flag, time budget, save status). The host platform is passed in
// by reference on each call, so the whole shell is a plain single-threaded
// loop:
//
//   run frame -> scan keys -> apply commands -> overlay -> pace -> repeat

pub mod config;

pub use config::{SaveConfig, SessionConfig, TimingConfig, VideoConfig, CONFIG_FILE};

use crate::core::{CoreError, EmulationCore};
use crate::display::font;
use crate::display::{Display, PaletteTable, Rect, Renderer, BLACK, WHITE};
use crate::input::{InputMapper, Keyboard};
use crate::save::{FileStore, LoadSource, SaveManager, SaveStatus};
use crate::timing::{Clock, FramePacer, SkipChange};

/// Frames a save status label stays on screen
pub const STATUS_FRAMES: u32 = 120;

/// Position of the save status label
pub const STATUS_POS: (usize, usize) = (2, 2);

/// Position of the timing overlay
pub const OVERLAY_POS: (usize, usize) = (2, 230);

/// Host services the session needs
pub trait Platform: Display + Keyboard + Clock {
    /// Put the device to sleep until the user wakes it
    fn suspend(&mut self);

    /// Teardown hook run before the program exits
    fn pre_exit(&mut self) {}
}

/// What the main loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit,
}

/// Errors that prevent a session from starting
#[derive(Debug)]
pub enum SessionError {
    /// The core refused to power on
    Core(CoreError),
    /// The configured key map is unusable
    KeyMap(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Core(e) => write!(f, "Failed to start emulation core: {}", e),
            SessionError::KeyMap(e) => write!(f, "Invalid key map: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Core(e) => Some(e),
            SessionError::KeyMap(_) => None,
        }
    }
}

impl From<CoreError> for SessionError {
    fn from(e: CoreError) -> Self {
        SessionError::Core(e)
    }
}

/// Running emulator session
pub struct Session<C: EmulationCore, S: FileStore> {
    core: C,
    renderer: Renderer,
    pacer: FramePacer,
    mapper: InputMapper,
    saves: SaveManager<S>,
    save_size: usize,
    frame_limiter: bool,
    overlay_enabled: bool,
    last_frame_ms: u64,
    status_shown: SaveStatus,
    status_frames_left: u32,
    /// A save ran; restart the label even if the status value is unchanged
    status_restart: bool,
    frames: u64,
}

impl<C: EmulationCore, S: FileStore> Session<C, S> {
    /// Bring up the core and restore its save
    ///
    /// # Arguments
    ///
    /// * `core` - Emulation core with a cartridge inserted
    /// * `store` - File store holding the save files
    /// * `config` - Startup settings
    /// * `platform` - Host services
    ///
    /// # Returns
    ///
    /// The session, or an error if the core cannot be powered on. The
    /// platform's `pre_exit` hook has already run when an error is returned.
    pub fn start<P: Platform + ?Sized>(
        mut core: C,
        store: S,
        config: &SessionConfig,
        platform: &mut P,
    ) -> Result<Self, SessionError> {
        let key_map = config.keys.to_key_map().map_err(SessionError::KeyMap)?;

        platform.clear();

        if let Err(e) = core.power_on() {
            log::error!("{}", e);
            platform.pre_exit();
            return Err(e.into());
        }

        let mut saves = SaveManager::new(store, &core.cartridge_title());
        let save_size = core.save_ram_size();
        if save_size > 0 {
            let loaded = saves.load(save_size);
            if let Ok(LoadSource::Fresh) = loaded.outcome {
                log::debug!("Cartridge RAM starts erased ({} bytes)", save_size);
            }
            core.attach_cart_ram(loaded.data);
        } else {
            log::info!("Cartridge has no battery-backed RAM, saves disabled");
        }

        let timing = &config.timing;
        let pacer = FramePacer::new(timing.target_frame_ms, timing.auto_frame_skip)
            .with_frame_skip(timing.frame_skip_default);

        log::info!(
            "Session started: {} scaling, {} palette",
            config.video.scale_mode.name(),
            config.video.palette.name()
        );

        Ok(Session {
            core,
            renderer: Renderer::new(
                PaletteTable::new(config.video.palette),
                config.video.scale_mode,
            ),
            pacer,
            mapper: InputMapper::new(key_map),
            saves,
            save_size,
            frame_limiter: timing.frame_limiter,
            overlay_enabled: false,
            last_frame_ms: 0,
            status_shown: SaveStatus::NoDisplay,
            status_frames_left: 0,
            status_restart: false,
            frames: 0,
        })
    }

    /// Run one frame of the main loop
    pub fn step_frame<P: Platform + ?Sized>(&mut self, platform: &mut P) -> FrameOutcome {
        let start = platform.now_millis();

        self.core.run_frame(&mut self.renderer.bind(platform));
        self.frames += 1;

        let input = self.mapper.map(platform.scan());
        self.core.set_joypad(input.joypad);

        let commands = input.commands;
        if let Some(palette) = commands.palette {
            if self.renderer.palette().active() != palette {
                log::info!("Palette: {}", palette.name());
            }
            self.renderer.palette_mut().select(palette);
        }
        if let Some(mode) = commands.scale_mode {
            if self.renderer.set_scale_mode(mode) {
                platform.clear();
                log::info!("Scale mode: {}", mode.name());
            }
        }
        if commands.save {
            self.save();
        }
        if commands.toggle_overlay {
            self.overlay_enabled = !self.overlay_enabled;
            platform.clear();
        }
        if commands.suspend {
            log::info!("Suspending");
            platform.suspend();
            platform.clear();
        }
        if commands.save_and_exit {
            self.save();
            platform.pre_exit();
            log::info!("Exiting after {} frames", self.frames);
            return FrameOutcome::Exit;
        }

        let end = platform.now_millis();
        let frame_ms = end.saturating_sub(start);

        if self.overlay_enabled {
            // skipped frames are faster, so show the average of the last two
            let average = (frame_ms + self.last_frame_ms) / 2;
            let text = format!("{} ms/f", average);
            platform.draw_string(&text, OVERLAY_POS.0, OVERLAY_POS.1, WHITE, BLACK);
        }
        self.last_frame_ms = frame_ms;

        self.draw_status(platform);

        if self.pacer.frame_skip_active() {
            self.renderer.toggle_skip_next_frame();
        }

        if self.frame_limiter {
            let pace = self.pacer.end_frame(frame_ms);
            if pace.sleep_ms > 0 {
                platform.sleep_millis(pace.sleep_ms);
            }
            match pace.skip {
                SkipChange::Enabled => log::debug!("Frame-skip enabled"),
                SkipChange::Disabled => {
                    self.renderer.set_skip_next_frame(false);
                    log::debug!("Frame-skip disabled");
                }
                SkipChange::Unchanged => {}
            }
        }

        FrameOutcome::Continue
    }

    /// Write the cartridge RAM to the store
    ///
    /// Failures are recorded in the save status only.
    pub fn save(&mut self) {
        if self.save_size == 0 {
            return;
        }
        // result is surfaced through the status label
        let _ = self.saves.store(self.core.cart_ram());
        self.status_restart = true;
    }

    /// Save and run the platform's exit hook
    pub fn shutdown<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.save();
        platform.pre_exit();
        log::info!("Session closed after {} frames", self.frames);
    }

    fn draw_status<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        let status = self.saves.status();
        if status != self.status_shown || self.status_restart {
            // the label on screen may be wider than the next one
            if let Some(label) = self.status_shown.label() {
                platform.fill_rect(status_rect(label), BLACK);
            }
            self.status_shown = status;
            self.status_frames_left = STATUS_FRAMES;
            self.status_restart = false;
        }

        let Some(label) = status.label() else {
            return;
        };
        if self.status_frames_left > 0 {
            platform.draw_string(label, STATUS_POS.0, STATUS_POS.1, WHITE, BLACK);
            self.status_frames_left -= 1;
        } else {
            platform.fill_rect(status_rect(label), BLACK);
            self.saves.clear_status();
            self.status_shown = SaveStatus::NoDisplay;
        }
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn saves(&self) -> &SaveManager<S> {
        &self.saves
    }

    pub fn save_status(&self) -> SaveStatus {
        self.saves.status()
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    /// Frames run since the session started
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

fn status_rect(label: &str) -> Rect {
    Rect::new(
        STATUS_POS.0,
        STATUS_POS.1,
        font::text_width(label),
        font::CELL_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rect() {
        let rect = status_rect("SAVED");
        assert_eq!(rect, Rect::new(2, 2, 5 * font::CELL_WIDTH, font::CELL_HEIGHT));
    }

    #[test]
    fn test_session_error_display() {
        let err: SessionError = CoreError::InvalidCartridge("no header".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Failed to start emulation core: Invalid cartridge: no header"
        );
    }
}
