// Configuration management
//
// Settings are read once at startup from a TOML file. Missing fields fall
// back to their defaults so a partial file is enough.

use crate::display::{PaletteKind, ScaleMode};
use crate::input::KeyMapConfig;
use crate::timing::DEFAULT_TARGET_FRAME_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "calcboy.toml";

/// Default storage capacity in bytes
pub const DEFAULT_MAX_STORE_SIZE: usize = 32 * 1024;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Frame pacing settings
    pub timing: TimingConfig,

    /// Save file settings
    pub save: SaveConfig,

    /// Key map
    pub keys: KeyMapConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Scaling mode at startup
    pub scale_mode: ScaleMode,

    /// Palette at startup
    pub palette: PaletteKind,

    /// Desktop window scale (1-4)
    pub window_scale: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            scale_mode: ScaleMode::MaximizedRatio,
            palette: PaletteKind::Original,
            window_scale: 2,
        }
    }
}

/// Frame pacing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep so frames last at least `target_frame_ms`
    pub frame_limiter: bool,

    /// Target frame duration in milliseconds
    pub target_frame_ms: u32,

    /// Let the pacer switch frame-skip on and off
    pub auto_frame_skip: bool,

    /// Frame-skip state at startup
    pub frame_skip_default: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            frame_limiter: true,
            target_frame_ms: DEFAULT_TARGET_FRAME_MS,
            auto_frame_skip: true,
            frame_skip_default: false,
        }
    }
}

/// Save file configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Directory holding the save files
    pub directory: PathBuf,

    /// Storage capacity in bytes, shared by all save files
    pub max_store_size: usize,
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            directory: PathBuf::from("saves"),
            max_store_size: DEFAULT_MAX_STORE_SIZE,
        }
    }
}

impl SessionConfig {
    /// Load configuration from file or create default
    ///
    /// If the file is missing or cannot be parsed, the default configuration
    /// is returned and written back to `path` on a best-effort basis.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::info!(
                "Could not load {} ({}), using defaults",
                path.as_ref().display(),
                e
            );
            let config = Self::default();
            if let Err(e) = config.save(&path) {
                log::warn!("Could not save default config: {}", e);
            }
            config
        })
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.video.scale_mode, ScaleMode::MaximizedRatio);
        assert_eq!(config.video.palette, PaletteKind::Original);
        assert!(config.timing.frame_limiter);
        assert_eq!(config.timing.target_frame_ms, 16);
        assert!(config.timing.auto_frame_skip);
        assert!(!config.timing.frame_skip_default);
        assert_eq!(config.save.directory, PathBuf::from("saves"));
        assert_eq!(config.save.max_store_size, 32768);
    }

    #[test]
    fn test_config_serialization() {
        let config = SessionConfig::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: SessionConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = "[video]\nscale_mode = \"maximized_2x\"\n\n[timing]\ntarget_frame_ms = 20\n";
        let config: SessionConfig = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.video.scale_mode, ScaleMode::Maximized2x);
        assert_eq!(config.video.palette, PaletteKind::Original);
        assert_eq!(config.timing.target_frame_ms, 20);
        assert!(config.timing.frame_limiter);
    }

    #[test]
    fn test_invalid_config_is_invalid_data() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[video]\nscale_mode = \"huge\"\n").unwrap();

        let err = SessionConfig::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_or_default_writes_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);

        let config = SessionConfig::load_or_default(&path);
        assert_eq!(config, SessionConfig::default());
        assert!(path.exists());
        assert_eq!(SessionConfig::load(&path).unwrap(), config);
    }
}
