// calcboy - Main Entry Point
//
// Runs the shell in a desktop window with the built-in test-pattern core.
// Saves go to the configured directory, settings to calcboy.toml.

use calcboy::core::PatternCore;
use calcboy::display::{run_device, DesktopPlatform, WindowConfig};
use calcboy::save::DirStore;
use calcboy::session::{Session, SessionConfig, CONFIG_FILE};

/// Cartridge RAM size of the demo cartridge (one 8 KiB bank)
const DEMO_RAM_SIZE: usize = 8 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("calcboy v{}", env!("CARGO_PKG_VERSION"));

    let config = SessionConfig::load_or_default(CONFIG_FILE);
    log::info!("Configuration loaded from '{}'", CONFIG_FILE);

    let store = DirStore::new(&config.save.directory, config.save.max_store_size);
    let core = PatternCore::new("CALCBOY DEMO", DEMO_RAM_SIZE);

    let mut platform = DesktopPlatform::new();
    let session = Session::start(core, store, &config, &mut platform)?;

    let window_config = WindowConfig::new().with_scale(config.video.window_scale);
    log::info!("Arrows: d-pad, Esc/Enter: A/B, Tab: save, 0: save and exit");

    run_device(window_config, session, platform)?;

    log::info!("Window closed");
    Ok(())
}
