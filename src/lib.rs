// calcboy - Game Boy frontend shell for a handheld calculator
// Rendering, frame pacing, input mapping and save persistence around an
// external emulation core

// Public modules
pub mod core;
pub mod display;
pub mod input;
pub mod save;
pub mod session;
pub mod timing;

// Re-export main types for convenience
pub use crate::core::{CoreError, EmulationCore, Joypad, LineSink, PatternCore, Scanline};
pub use display::{
    Display, FrameBuffer, PaletteKind, PaletteTable, Rect, Renderer, ScaleMode, WindowConfig,
};
pub use input::{InputMapper, Key, KeyMap, Keyboard, KeyboardState};
pub use save::{save_file_name, DirStore, FileStore, Lz4Codec, MemoryStore, SaveManager, SaveStatus};
pub use session::{FrameOutcome, Platform, Session, SessionConfig};
pub use timing::{Clock, FramePacer, SystemClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that all components can be instantiated
        let _renderer = Renderer::default();
        let _pacer = FramePacer::default();
        let _mapper = InputMapper::default();
        let _frame_buffer = FrameBuffer::new();
        let _config = SessionConfig::default();
        let _saves = SaveManager::new(MemoryStore::new(1024), &[0; crate::core::TITLE_LEN]);
        let _core = PatternCore::new("PATTERN", 0);
    }
}
