use anyhow::{Context, Result};
use quest_core::frontend::terminal::{KeyboardInput, TerminalRenderer, TerminalSession};
use quest_core::{RunOutcome, TraversalEngine};
use quest_rules::{GameConfig, WorldData};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV_VAR: &str = "BEETLE_QUEST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "beetle_quest.toml";

fn main() -> Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = GameConfig::load_or_default(Some(&config_path))
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    init_tracing(&config.log_path)?;
    info!(config = %config_path.display(), "starting Beetle Quest");

    let world = WorldData::load(&config.map_points_path, &config.events_path)
        .context("loading world data")?;
    for violation in world.integrity_violations() {
        warn!(%violation, "world data integrity problem");
    }

    let outcome = {
        let _session = TerminalSession::enter().context("entering terminal mode")?;
        let renderer = TerminalRenderer::new(&world, config.view);
        let mut engine = TraversalEngine::new(&world, &config, KeyboardInput::new(), renderer)?;
        info!(session = %engine.session_id(), "terminal ready");
        engine.run()?
    };

    match outcome {
        RunOutcome::Finished(ending) if ending.won => {
            info!(message = %ending.message, "player won");
            println!("{}", ending.message);
        }
        RunOutcome::Finished(ending) => {
            info!(message = %ending.message, "player died");
            println!("{}", ending.message);
        }
        RunOutcome::Quit => {
            info!("player quit");
            println!("See you next time.");
        }
    }
    Ok(())
}

/// Log to a file. The terminal belongs to the game.
fn init_tracing(log_path: &Path) -> Result<()> {
    let file = File::create(log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}
